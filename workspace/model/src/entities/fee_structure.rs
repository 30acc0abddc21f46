use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// The fee owed by every student of `class` for one term of one year.
///
/// `(class, term, year)` is unique. `class` is compared by value with
/// `student.class`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub class: String,
    pub term: String,
    pub year: i32,
    /// Amount owed for the term.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub description: Option<String>,
    /// Free-form due date as entered by the administrator.
    pub due_date: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_payment::Entity")]
    FeePayment,
}

impl Related<super::fee_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeePayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
