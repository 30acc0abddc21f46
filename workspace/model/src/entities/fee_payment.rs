use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{fee_structure, student};

/// One installment paid by a student against a fee structure.
///
/// Rows are append-only: nothing updates or deletes a payment once written.
/// Payments made on the same day are ordered by `id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub fee_structure_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount_paid: Decimal,
    /// Server date of recording, no time of day.
    pub date_paid: NaiveDate,
    /// `RCPT-YYYYMMDD-XXXXXX`, unique across all payments.
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub payment_method: String,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "student::Entity",
        from = "Column::StudentId",
        to = "student::Column::Id",
        on_delete = "Restrict"
    )]
    Student,
    #[sea_orm(
        belongs_to = "fee_structure::Entity",
        from = "Column::FeeStructureId",
        to = "fee_structure::Column::Id",
        on_delete = "Restrict"
    )]
    FeeStructure,
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<fee_structure::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
