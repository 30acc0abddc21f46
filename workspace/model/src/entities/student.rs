use sea_orm::entity::prelude::*;

/// A pupil enrolled at the school.
///
/// `class` holds the name of the section the student currently sits in. Fee
/// structures and timetable rows are matched against it by value, there is no
/// foreign key behind it, so renaming a class detaches the student from fees
/// that were defined for the old name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub admission_number: String,
    pub name: String,
    pub age: Option<i32>,
    pub class: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contacts: Option<String>,
    pub guardian_email: Option<String>,
    pub address: Option<String>,
    pub has_medical_condition: bool,
    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_payment::Entity")]
    FeePayment,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::grade::Entity")]
    Grade,
}

impl Related<super::fee_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePayment.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
