use model::entities::{grading_system, school_settings, subject};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm_migration::prelude::*;

const DEFAULT_SUBJECTS: [&str; 10] = [
    "Mathematics",
    "English",
    "Science",
    "History",
    "Geography",
    "Physics",
    "Chemistry",
    "Biology",
    "Business Studies",
    "Computer Studies",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        grading_system::ActiveModel {
            name: Set(grading_system::DEFAULT_NAME.to_string()),
            min_a: Set(80),
            max_a: Set(100),
            min_b: Set(70),
            max_b: Set(79),
            min_c: Set(60),
            max_c: Set(69),
            min_d: Set(50),
            max_d: Set(59),
            min_f: Set(0),
            max_f: Set(49),
            is_default: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;

        school_settings::ActiveModel {
            id: Set(school_settings::SINGLETON_ID),
            school_name: Set(school_settings::DEFAULT_SCHOOL_NAME.to_string()),
            school_address: Set(None),
            school_phone: Set(None),
            school_email: Set(None),
        }
        .insert(db)
        .await?;

        for name in DEFAULT_SUBJECTS {
            subject::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        subject::Entity::delete_many()
            .filter(subject::Column::Name.is_in(DEFAULT_SUBJECTS))
            .exec(db)
            .await?;

        school_settings::Entity::delete_by_id(school_settings::SINGLETON_ID).exec(db).await?;

        grading_system::Entity::delete_many()
            .filter(grading_system::Column::Name.eq(grading_system::DEFAULT_NAME))
            .exec(db)
            .await?;

        Ok(())
    }
}
