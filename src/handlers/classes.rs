use std::collections::HashMap;

use crate::handlers::teachers::find_teacher;
use crate::helpers::errors::{ApiError, is_unique_violation};
use crate::helpers::responses::{HandlerResult, error_response, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{school_class, student, teacher};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a class
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateClassRequest {
    /// Class name (must be unique). Students and fee structures refer to it by name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub teacher_id: Option<i32>,
    pub description: Option<String>,
}

/// Request body for updating a class
///
/// Renaming a class does not move its students or fee structures.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub teacher_id: Option<i32>,
    pub description: Option<String>,
}

/// Class response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassResponse {
    pub id: i32,
    pub name: String,
    pub teacher_id: Option<i32>,
    pub teacher_name: Option<String>,
    pub description: Option<String>,
    /// Students whose class string equals the class name
    pub student_count: u64,
}

impl ClassResponse {
    fn new(class: school_class::Model, teacher: Option<teacher::Model>, student_count: u64) -> Self {
        Self {
            id: class.id,
            name: class.name,
            teacher_id: class.teacher_id,
            teacher_name: teacher.map(|t| t.name),
            description: class.description,
            student_count,
        }
    }
}

/// Create a class
#[utoipa::path(
    post,
    path = "/api/v1/classes",
    tag = "classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created successfully", body = ApiResponse<ClassResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Class name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateClassRequest>>,
) -> HandlerResult<ClassResponse> {
    trace!("Entering create_class function");
    let teacher = match request.teacher_id {
        Some(teacher_id) => Some(find_teacher(&state.db, teacher_id).await?),
        None => None,
    };

    let new_class = school_class::ActiveModel {
        name: Set(request.name.clone()),
        teacher_id: Set(request.teacher_id),
        description: Set(request.description),
        ..Default::default()
    };

    match new_class.insert(&state.db).await {
        Ok(class) => {
            info!("Class '{}' created with ID: {}", class.name, class.id);
            let count = count_students(&state.db, &class.name).await?;
            respond(
                StatusCode::CREATED,
                ClassResponse::new(class, teacher, count),
                "Class created successfully",
            )
        }
        Err(e) if is_unique_violation(&e) => {
            warn!("Class '{}' already exists", request.name);
            Err(error_response(
                StatusCode::CONFLICT,
                "DUPLICATE_CLASS",
                format!("Class with name '{}' already exists", request.name),
            ))
        }
        Err(e) => {
            error!("Failed to create class: {}", e);
            Err(ApiError::from(e).into())
        }
    }
}

/// List classes with their teacher and head count
#[utoipa::path(
    get,
    path = "/api/v1/classes",
    tag = "classes",
    responses(
        (status = 200, description = "Classes retrieved successfully", body = ApiResponse<Vec<ClassResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_classes(State(state): State<AppState>) -> HandlerResult<Vec<ClassResponse>> {
    trace!("Entering get_classes function");
    let classes = school_class::Entity::find()
        .find_also_related(teacher::Entity)
        .order_by_asc(school_class::Column::Name)
        .all(&state.db)
        .await?;

    let counts: HashMap<String, i64> = student::Entity::find()
        .select_only()
        .column(student::Column::Class)
        .column_as(student::Column::Id.count(), "student_count")
        .filter(student::Column::Class.is_not_null())
        .group_by(student::Column::Class)
        .into_tuple::<(String, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();
    debug!("Retrieved {} class(es)", classes.len());

    let response = classes
        .into_iter()
        .map(|(class, teacher)| {
            let count = counts.get(&class.name).copied().unwrap_or(0).max(0) as u64;
            ClassResponse::new(class, teacher, count)
        })
        .collect();
    respond(StatusCode::OK, response, "Classes retrieved successfully")
}

/// Get a class by ID
#[utoipa::path(
    get,
    path = "/api/v1/classes/{class_id}",
    tag = "classes",
    params(
        ("class_id" = i32, Path, description = "Class ID"),
    ),
    responses(
        (status = 200, description = "Class retrieved successfully", body = ApiResponse<ClassResponse>),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_class(
    Path(class_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<ClassResponse> {
    trace!("Entering get_class function for class_id: {}", class_id);
    let (class, teacher) = school_class::Entity::find_by_id(class_id)
        .find_also_related(teacher::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Class with ID {} not found", class_id);
            ApiError::not_found("Class", class_id)
        })?;
    let count = count_students(&state.db, &class.name).await?;

    respond(
        StatusCode::OK,
        ClassResponse::new(class, teacher, count),
        "Class retrieved successfully",
    )
}

/// Update a class
#[utoipa::path(
    put,
    path = "/api/v1/classes/{class_id}",
    tag = "classes",
    params(
        ("class_id" = i32, Path, description = "Class ID"),
    ),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Class updated successfully", body = ApiResponse<ClassResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse),
        (status = 409, description = "Class name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_class(
    Path(class_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateClassRequest>>,
) -> HandlerResult<ClassResponse> {
    trace!("Entering update_class function for class_id: {}", class_id);
    let class = school_class::Entity::find_by_id(class_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Class", class_id))?;

    let mut active: school_class::ActiveModel = class.into();
    let mut updated_fields = Vec::new();
    if let Some(name) = request.name {
        active.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(teacher_id) = request.teacher_id {
        find_teacher(&state.db, teacher_id).await?;
        active.teacher_id = Set(Some(teacher_id));
        updated_fields.push("teacher_id");
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
        updated_fields.push("description");
    }

    debug!("Updating class {} fields: {:?}", class_id, updated_fields);
    let class = active.update(&state.db).await?;
    let teacher = match class.teacher_id {
        Some(teacher_id) => teacher::Entity::find_by_id(teacher_id).one(&state.db).await?,
        None => None,
    };
    let count = count_students(&state.db, &class.name).await?;
    info!("Class {} updated successfully", class_id);

    respond(
        StatusCode::OK,
        ClassResponse::new(class, teacher, count),
        "Class updated successfully",
    )
}

/// Delete a class
///
/// Students and fee structures keep their class name.
#[utoipa::path(
    delete,
    path = "/api/v1/classes/{class_id}",
    tag = "classes",
    params(
        ("class_id" = i32, Path, description = "Class ID"),
    ),
    responses(
        (status = 200, description = "Class deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_class(
    Path(class_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<String> {
    trace!("Entering delete_class function for class_id: {}", class_id);
    let result = school_class::Entity::delete_by_id(class_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        warn!("Class with ID {} not found for deletion", class_id);
        return Err(ApiError::not_found("Class", class_id).into());
    }

    info!("Class with ID {} deleted successfully", class_id);
    respond(
        StatusCode::OK,
        format!("Class {} deleted", class_id),
        "Class deleted successfully",
    )
}

async fn count_students(db: &DatabaseConnection, class_name: &str) -> Result<u64, ApiError> {
    Ok(student::Entity::find()
        .filter(student::Column::Class.eq(class_name))
        .count(db)
        .await?)
}
