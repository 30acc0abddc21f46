use sea_orm::entity::prelude::*;

/// A member of the teaching staff.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A teacher can be the class teacher of several sections.
    #[sea_orm(has_many = "super::school_class::Entity")]
    SchoolClass,
    #[sea_orm(has_many = "super::timetable_entry::Entity")]
    TimetableEntry,
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolClass.def()
    }
}

impl Related<super::timetable_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimetableEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
