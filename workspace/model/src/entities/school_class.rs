use sea_orm::entity::prelude::*;

use super::teacher;

/// A class (section) such as "Form 1". The name is what students, fee
/// structures and timetable rows refer to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Class teacher, cleared when the teacher is removed.
    pub teacher_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "teacher::Entity",
        from = "Column::TeacherId",
        to = "teacher::Column::Id",
        on_delete = "SetNull"
    )]
    Teacher,
}

impl Related<teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
