use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outstanding amount for one fee structure of a student's class.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FeeStructureBalance {
    pub fee_structure_id: i32,
    pub class: String,
    pub term: String,
    pub year: i32,
    #[schema(value_type = String, example = "1000")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "400")]
    pub paid_amount: Decimal,
    /// `amount - paid_amount`. Negative when the student has overpaid.
    #[schema(value_type = String, example = "600")]
    pub balance: Decimal,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// All fee structures that apply to a student, with totals.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FeeSummary {
    pub student_id: i32,
    /// Class name the structures were matched against.
    pub class: Option<String>,
    pub structures: Vec<FeeStructureBalance>,
    #[schema(value_type = String)]
    pub total_fee: Decimal,
    #[schema(value_type = String)]
    pub total_paid: Decimal,
    #[schema(value_type = String)]
    pub balance: Decimal,
}

/// Balance before and after a single payment, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReceiptBreakdown {
    pub payment_id: i32,
    #[schema(value_type = String, example = "600")]
    pub previous_balance: Decimal,
    #[schema(value_type = String, example = "700")]
    pub amount_paid: Decimal,
    #[schema(value_type = String, example = "-100")]
    pub new_balance: Decimal,
}
