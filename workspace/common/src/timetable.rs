use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TimetableSlot {
    pub id: i32,
    pub class: String,
    pub period: i32,
    pub subject: String,
    pub teacher_id: Option<i32>,
    pub teacher_name: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
    /// CSS colour used to render the subject.
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TimetableDay {
    pub day: String,
    pub slots: Vec<TimetableSlot>,
}

/// Timetable grouped by weekday, Monday first. Days without lessons are kept
/// with an empty slot list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct TimetableGrid {
    pub days: Vec<TimetableDay>,
}
