//! Transport-layer types for values computed from the registry.
//! These are the shapes the HTTP API serializes for balances, attendance
//! summaries, grade reports and the timetable grid.

mod attendance;
mod fees;
mod grades;
mod timetable;

pub use attendance::AttendanceSummary;
pub use fees::{FeeStructureBalance, FeeSummary, ReceiptBreakdown};
pub use grades::{GradeReport, SubjectPerformance, TermSummary};
pub use timetable::{TimetableDay, TimetableGrid, TimetableSlot};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

/// Head counts shown on the administrator dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub students: u64,
    pub teachers: u64,
    pub classes: u64,
}
