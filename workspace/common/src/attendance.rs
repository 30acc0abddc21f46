use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Counts of attendance marks and the attendance rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct AttendanceSummary {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    /// Percentage of days attended, late counting as attended. One decimal.
    #[schema(example = 87.5)]
    pub rate: f64,
}
