use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::teacher;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for adding a teacher
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTeacherRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
}

/// Request body for updating a teacher
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTeacherRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
}

/// Teacher response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeacherResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
}

impl From<teacher::Model> for TeacherResponse {
    fn from(model: teacher::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            qualification: model.qualification,
        }
    }
}

/// Add a teacher
#[utoipa::path(
    post,
    path = "/api/v1/teachers",
    tag = "teachers",
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created successfully", body = ApiResponse<TeacherResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_teacher(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTeacherRequest>>,
) -> HandlerResult<TeacherResponse> {
    trace!("Entering create_teacher function");

    let new_teacher = teacher::ActiveModel {
        name: Set(request.name),
        email: Set(request.email),
        phone: Set(request.phone),
        qualification: Set(request.qualification),
        ..Default::default()
    };

    match new_teacher.insert(&state.db).await {
        Ok(teacher) => {
            info!("Teacher created successfully with ID: {}", teacher.id);
            respond(
                StatusCode::CREATED,
                TeacherResponse::from(teacher),
                "Teacher created successfully",
            )
        }
        Err(e) => {
            error!("Failed to create teacher: {}", e);
            Err(ApiError::from(e).into())
        }
    }
}

/// List teachers by name
#[utoipa::path(
    get,
    path = "/api/v1/teachers",
    tag = "teachers",
    responses(
        (status = 200, description = "Teachers retrieved successfully", body = ApiResponse<Vec<TeacherResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_teachers(State(state): State<AppState>) -> HandlerResult<Vec<TeacherResponse>> {
    trace!("Entering get_teachers function");
    let teachers = teacher::Entity::find()
        .order_by_asc(teacher::Column::Name)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} teacher(s)", teachers.len());

    respond(
        StatusCode::OK,
        teachers.into_iter().map(TeacherResponse::from).collect(),
        "Teachers retrieved successfully",
    )
}

/// Get a teacher by ID
#[utoipa::path(
    get,
    path = "/api/v1/teachers/{teacher_id}",
    tag = "teachers",
    params(
        ("teacher_id" = i32, Path, description = "Teacher ID"),
    ),
    responses(
        (status = 200, description = "Teacher retrieved successfully", body = ApiResponse<TeacherResponse>),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    Path(teacher_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<TeacherResponse> {
    trace!("Entering get_teacher function for teacher_id: {}", teacher_id);
    let teacher = find_teacher(&state.db, teacher_id).await?;
    respond(
        StatusCode::OK,
        TeacherResponse::from(teacher),
        "Teacher retrieved successfully",
    )
}

/// Update a teacher
#[utoipa::path(
    put,
    path = "/api/v1/teachers/{teacher_id}",
    tag = "teachers",
    params(
        ("teacher_id" = i32, Path, description = "Teacher ID"),
    ),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated successfully", body = ApiResponse<TeacherResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_teacher(
    Path(teacher_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTeacherRequest>>,
) -> HandlerResult<TeacherResponse> {
    trace!("Entering update_teacher function for teacher_id: {}", teacher_id);
    let mut active: teacher::ActiveModel = find_teacher(&state.db, teacher_id).await?.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(email) = request.email {
        active.email = Set(Some(email));
        updated_fields.push("email");
    }
    if let Some(phone) = request.phone {
        active.phone = Set(Some(phone));
        updated_fields.push("phone");
    }
    if let Some(qualification) = request.qualification {
        active.qualification = Set(Some(qualification));
        updated_fields.push("qualification");
    }

    debug!("Updating teacher {} fields: {:?}", teacher_id, updated_fields);
    let teacher = active.update(&state.db).await?;
    info!("Teacher {} updated successfully", teacher_id);
    respond(
        StatusCode::OK,
        TeacherResponse::from(teacher),
        "Teacher updated successfully",
    )
}

/// Remove a teacher
///
/// Classes and lessons taught by the teacher are kept without a teacher.
#[utoipa::path(
    delete,
    path = "/api/v1/teachers/{teacher_id}",
    tag = "teachers",
    params(
        ("teacher_id" = i32, Path, description = "Teacher ID"),
    ),
    responses(
        (status = 200, description = "Teacher deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    Path(teacher_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<String> {
    trace!("Entering delete_teacher function for teacher_id: {}", teacher_id);

    let result = teacher::Entity::delete_by_id(teacher_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Teacher with ID {} not found for deletion", teacher_id);
        return Err(ApiError::not_found("Teacher", teacher_id).into());
    }

    info!("Teacher with ID {} deleted successfully", teacher_id);
    respond(
        StatusCode::OK,
        format!("Teacher {} deleted", teacher_id),
        "Teacher deleted successfully",
    )
}

pub(crate) async fn find_teacher(
    db: &DatabaseConnection,
    teacher_id: i32,
) -> Result<teacher::Model, ApiError> {
    teacher::Entity::find_by_id(teacher_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            warn!("Teacher with ID {} not found", teacher_id);
            ApiError::not_found("Teacher", teacher_id)
        })
}
