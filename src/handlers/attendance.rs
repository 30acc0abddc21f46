use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use compute::attendance::{self, AttendanceEntry, RosterEntry};
use model::entities::attendance::{self as attendance_entity, AttendanceStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the daily roster
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Day of the roster (default: today)
    pub date: Option<NaiveDate>,
    /// Only students of this class
    pub class: Option<String>,
}

/// One mark in a bulk save
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceMark {
    pub student_id: i32,
    /// `Present`, `Absent`, `Late` or `Excused`
    #[schema(example = "Present")]
    pub status: String,
    pub remarks: Option<String>,
}

/// Request body for saving a day's attendance
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct SaveAttendanceRequest {
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub entries: Vec<AttendanceMark>,
}

/// Attendance mark response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub status: String,
    pub remarks: Option<String>,
}

impl From<attendance_entity::Model> for AttendanceResponse {
    fn from(model: attendance_entity::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            date: model.date,
            status: model.status.to_string(),
            remarks: model.remarks,
        }
    }
}

/// A student on the roster with their mark, if one was taken
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RosterEntryResponse {
    pub student_id: i32,
    pub admission_number: String,
    pub name: String,
    pub class: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

impl From<RosterEntry> for RosterEntryResponse {
    fn from(entry: RosterEntry) -> Self {
        let (status, remarks) = match entry.record {
            Some(record) => (Some(record.status.to_string()), record.remarks),
            None => (None, None),
        };
        Self {
            student_id: entry.student.id,
            admission_number: entry.student.admission_number,
            name: entry.student.name,
            class: entry.student.class,
            status,
            remarks,
        }
    }
}

/// Students with their attendance status on a day
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    tag = "attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Roster retrieved successfully", body = ApiResponse<Vec<RosterEntryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    Valid(Query(query)): Valid<Query<AttendanceQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<RosterEntryResponse>> {
    trace!("Entering get_attendance function");
    let date = query.date.unwrap_or_else(|| state.ledger.today());

    let roster = attendance::class_roster(&state.db, date, query.class.as_deref()).await?;
    info!("Roster for {} has {} student(s)", date, roster.len());

    respond(
        StatusCode::OK,
        roster.into_iter().map(RosterEntryResponse::from).collect(),
        "Roster retrieved successfully",
    )
}

/// Save the marks of a day, replacing earlier marks for the same students
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    tag = "attendance",
    request_body = SaveAttendanceRequest,
    responses(
        (status = 200, description = "Attendance saved successfully", body = ApiResponse<Vec<AttendanceResponse>>),
        (status = 400, description = "Unknown status or empty request", body = ErrorResponse),
        (status = 404, description = "Student not found, nothing was saved", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn save_attendance(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<SaveAttendanceRequest>>,
) -> HandlerResult<Vec<AttendanceResponse>> {
    trace!("Entering save_attendance function");

    let entries = request
        .entries
        .into_iter()
        .map(|mark| {
            let status = mark.status.parse::<AttendanceStatus>().map_err(|e| {
                warn!("Rejected mark for student {}: {}", mark.student_id, e);
                ApiError::BadRequest(e)
            })?;
            Ok(AttendanceEntry {
                student_id: mark.student_id,
                status,
                remarks: mark.remarks,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    debug!("Saving {} mark(s) for {}", entries.len(), request.date);
    let saved = attendance::record_attendance(&state.db, request.date, &entries).await?;

    respond(
        StatusCode::OK,
        saved.into_iter().map(AttendanceResponse::from).collect(),
        "Attendance saved successfully",
    )
}
