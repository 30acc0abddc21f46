use crate::handlers::teachers::find_teacher;
use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{TimetableGrid, TimetableSlot};
use compute::timetable::{self, TimetableFilter, to_slot};
use model::entities::teacher;
use model::entities::timetable_entry::{self, Weekday};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for adding a lesson to the timetable
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTimetableEntryRequest {
    #[validate(length(min = 1, max = 100))]
    pub class: String,
    /// English weekday name, case-insensitive
    #[schema(example = "Monday")]
    pub day: String,
    /// Lesson number within the day, starting at 1
    #[validate(range(min = 1, max = 20))]
    pub period: i32,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub teacher_id: Option<i32>,
    pub room: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating a lesson
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTimetableEntryRequest {
    #[validate(length(min = 1, max = 100))]
    pub class: Option<String>,
    pub day: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub period: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    pub teacher_id: Option<i32>,
    pub room: Option<String>,
    pub description: Option<String>,
}

/// Filters for the timetable listing and grid
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct TimetableQuery {
    pub class: Option<String>,
    pub teacher_id: Option<i32>,
    /// English weekday name, case-insensitive
    pub day: Option<String>,
}

impl TimetableQuery {
    fn filter(self) -> Result<TimetableFilter, ApiError> {
        Ok(TimetableFilter {
            class: self.class,
            teacher_id: self.teacher_id,
            day: self.day.as_deref().map(parse_day).transpose()?,
        })
    }
}

/// A lesson with its weekday
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimetableEntryResponse {
    pub day: String,
    #[serde(flatten)]
    pub slot: TimetableSlot,
}

impl TimetableEntryResponse {
    fn new(entry: &timetable_entry::Model, teacher: Option<&teacher::Model>) -> Self {
        Self {
            day: entry.day.to_string(),
            slot: to_slot(entry, teacher),
        }
    }
}

fn parse_day(day: &str) -> Result<Weekday, ApiError> {
    day.trim().parse::<Weekday>().map_err(|e| {
        warn!("Rejected weekday: {}", e);
        ApiError::BadRequest(e)
    })
}

/// Add a lesson
#[utoipa::path(
    post,
    path = "/api/v1/timetable",
    tag = "timetable",
    request_body = CreateTimetableEntryRequest,
    responses(
        (status = 201, description = "Lesson created successfully", body = ApiResponse<TimetableEntryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_timetable_entry(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTimetableEntryRequest>>,
) -> HandlerResult<TimetableEntryResponse> {
    trace!("Entering create_timetable_entry function");
    let day = parse_day(&request.day)?;
    let teacher = match request.teacher_id {
        Some(teacher_id) => Some(find_teacher(&state.db, teacher_id).await?),
        None => None,
    };

    let entry = timetable_entry::ActiveModel {
        class: Set(request.class),
        day: Set(day),
        period: Set(request.period),
        subject: Set(request.subject),
        teacher_id: Set(request.teacher_id),
        room: Set(request.room),
        description: Set(request.description),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    info!(
        "Lesson {} added: {} {} period {}",
        entry.id, entry.class, entry.day, entry.period
    );

    respond(
        StatusCode::CREATED,
        TimetableEntryResponse::new(&entry, teacher.as_ref()),
        "Lesson created successfully",
    )
}

/// List lessons ordered by weekday and period
#[utoipa::path(
    get,
    path = "/api/v1/timetable",
    tag = "timetable",
    params(TimetableQuery),
    responses(
        (status = 200, description = "Lessons retrieved successfully", body = ApiResponse<Vec<TimetableEntryResponse>>),
        (status = 400, description = "Unknown weekday", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timetable_entries(
    Valid(Query(query)): Valid<Query<TimetableQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<TimetableEntryResponse>> {
    let filter = query.filter()?;
    let rows = timetable::entries(&state.db, &filter).await?;
    debug!("Retrieved {} lesson(s)", rows.len());

    respond(
        StatusCode::OK,
        rows.iter()
            .map(|(entry, teacher)| TimetableEntryResponse::new(entry, teacher.as_ref()))
            .collect(),
        "Lessons retrieved successfully",
    )
}

/// Lessons grouped per weekday, Monday first
#[utoipa::path(
    get,
    path = "/api/v1/timetable/grid",
    tag = "timetable",
    params(TimetableQuery),
    responses(
        (status = 200, description = "Timetable grid built successfully", body = ApiResponse<TimetableGrid>),
        (status = 400, description = "Unknown weekday", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timetable_grid(
    Valid(Query(query)): Valid<Query<TimetableQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<TimetableGrid> {
    let filter = query.filter()?;
    let grid = timetable::weekly_grid(&state.db, &filter).await?;
    respond(StatusCode::OK, grid, "Timetable grid built successfully")
}

/// Get a lesson by ID
#[utoipa::path(
    get,
    path = "/api/v1/timetable/{entry_id}",
    tag = "timetable",
    params(
        ("entry_id" = i32, Path, description = "Timetable entry ID"),
    ),
    responses(
        (status = 200, description = "Lesson retrieved successfully", body = ApiResponse<TimetableEntryResponse>),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_timetable_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<TimetableEntryResponse> {
    let (entry, teacher) = timetable_entry::Entity::find_by_id(entry_id)
        .find_also_related(teacher::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Timetable entry with ID {} not found", entry_id);
            ApiError::not_found("Timetable entry", entry_id)
        })?;

    respond(
        StatusCode::OK,
        TimetableEntryResponse::new(&entry, teacher.as_ref()),
        "Lesson retrieved successfully",
    )
}

/// Update a lesson
#[utoipa::path(
    put,
    path = "/api/v1/timetable/{entry_id}",
    tag = "timetable",
    params(
        ("entry_id" = i32, Path, description = "Timetable entry ID"),
    ),
    request_body = UpdateTimetableEntryRequest,
    responses(
        (status = 200, description = "Lesson updated successfully", body = ApiResponse<TimetableEntryResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Lesson or teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_timetable_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTimetableEntryRequest>>,
) -> HandlerResult<TimetableEntryResponse> {
    trace!("Entering update_timetable_entry function for entry_id: {}", entry_id);
    let entry = timetable_entry::Entity::find_by_id(entry_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Timetable entry", entry_id))?;

    let mut active: timetable_entry::ActiveModel = entry.into();
    if let Some(class) = request.class {
        active.class = Set(class);
    }
    if let Some(day) = request.day.as_deref() {
        active.day = Set(parse_day(day)?);
    }
    if let Some(period) = request.period {
        active.period = Set(period);
    }
    if let Some(subject) = request.subject {
        active.subject = Set(subject);
    }
    if let Some(teacher_id) = request.teacher_id {
        find_teacher(&state.db, teacher_id).await?;
        active.teacher_id = Set(Some(teacher_id));
    }
    if let Some(room) = request.room {
        active.room = Set(Some(room));
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }

    let entry = active.update(&state.db).await?;
    let teacher = match entry.teacher_id {
        Some(teacher_id) => teacher::Entity::find_by_id(teacher_id).one(&state.db).await?,
        None => None,
    };
    info!("Timetable entry {} updated successfully", entry_id);

    respond(
        StatusCode::OK,
        TimetableEntryResponse::new(&entry, teacher.as_ref()),
        "Lesson updated successfully",
    )
}

/// Delete a lesson
#[utoipa::path(
    delete,
    path = "/api/v1/timetable/{entry_id}",
    tag = "timetable",
    params(
        ("entry_id" = i32, Path, description = "Timetable entry ID"),
    ),
    responses(
        (status = 200, description = "Lesson deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_timetable_entry(
    Path(entry_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<String> {
    let result = timetable_entry::Entity::delete_by_id(entry_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Timetable entry with ID {} not found for deletion", entry_id);
        return Err(ApiError::not_found("Timetable entry", entry_id).into());
    }

    info!("Timetable entry {} deleted successfully", entry_id);
    respond(
        StatusCode::OK,
        format!("Timetable entry {} deleted", entry_id),
        "Lesson deleted successfully",
    )
}
