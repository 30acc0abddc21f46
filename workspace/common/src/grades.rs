use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Average over every grade a student has in one term.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TermSummary {
    pub year: i32,
    pub term: String,
    #[schema(value_type = String, example = "72.5")]
    pub average_score: Decimal,
    pub subject_count: u64,
    /// Letter for the average under the current thresholds.
    pub grade: String,
}

/// Average over every grade a student has in one subject.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubjectPerformance {
    pub subject: String,
    #[schema(value_type = String, example = "81")]
    pub average_score: Decimal,
    pub count: u64,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GradeReport {
    pub student_id: i32,
    /// Newest year first, terms in name order.
    pub terms: Vec<TermSummary>,
    /// Best subject first.
    pub subjects: Vec<SubjectPerformance>,
}
