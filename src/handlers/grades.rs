use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::lookup::find_student;
use model::entities::{grade, student};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for recording a grade
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateGradeRequest {
    pub student_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, max = 50))]
    pub term: String,
    #[validate(range(min = 1900, max = 2200))]
    pub year: i32,
    /// Any value is accepted. Scores outside every band are an F.
    #[schema(value_type = String, example = "78.5")]
    pub score: Decimal,
    pub remarks: Option<String>,
}

/// Request body for updating a grade
///
/// The letter is classified again against the current thresholds.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateGradeRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub term: Option<String>,
    #[validate(range(min = 1900, max = 2200))]
    pub year: Option<i32>,
    #[schema(value_type = Option<String>, example = "81")]
    pub score: Option<Decimal>,
    pub remarks: Option<String>,
}

/// Query parameters for listing grades
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct GradeQuery {
    pub student_id: Option<i32>,
    pub subject: Option<String>,
    pub term: Option<String>,
    pub year: Option<i32>,
}

/// Grade response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GradeResponse {
    pub id: i32,
    pub student_id: i32,
    pub student_name: Option<String>,
    pub subject: String,
    pub term: String,
    pub year: i32,
    #[schema(value_type = String, example = "78.5")]
    pub score: Decimal,
    /// Letter assigned when the grade was last saved
    #[schema(example = "B")]
    pub grade: String,
    pub remarks: Option<String>,
}

impl GradeResponse {
    fn new(model: grade::Model, student: Option<student::Model>) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            student_name: student.map(|s| s.name),
            subject: model.subject,
            term: model.term,
            year: model.year,
            score: model.score,
            grade: model.grade.to_string(),
            remarks: model.remarks,
        }
    }
}

/// Record a grade; its letter is classified from the current thresholds
#[utoipa::path(
    post,
    path = "/api/v1/grades",
    tag = "grades",
    request_body = CreateGradeRequest,
    responses(
        (status = 201, description = "Grade created successfully", body = ApiResponse<GradeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_grade(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateGradeRequest>>,
) -> HandlerResult<GradeResponse> {
    trace!("Entering create_grade function");
    let student = find_student(&state.db, request.student_id).await?;
    let letter = state.classifier.classify(&state.db, request.score).await;
    debug!("Score {} for {} graded {}", request.score, student.name, letter);

    let new_grade = grade::ActiveModel {
        student_id: Set(request.student_id),
        subject: Set(request.subject),
        term: Set(request.term),
        year: Set(request.year),
        score: Set(request.score),
        grade: Set(letter),
        remarks: Set(request.remarks),
        ..Default::default()
    };

    match new_grade.insert(&state.db).await {
        Ok(grade) => {
            info!("Grade created successfully with ID: {}", grade.id);
            respond(
                StatusCode::CREATED,
                GradeResponse::new(grade, Some(student)),
                "Grade created successfully",
            )
        }
        Err(e) => {
            error!("Failed to create grade: {}", e);
            Err(ApiError::from(e).into())
        }
    }
}

/// List grades
#[utoipa::path(
    get,
    path = "/api/v1/grades",
    tag = "grades",
    params(GradeQuery),
    responses(
        (status = 200, description = "Grades retrieved successfully", body = ApiResponse<Vec<GradeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_grades(
    Valid(Query(query)): Valid<Query<GradeQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<GradeResponse>> {
    trace!("Entering get_grades function");

    let mut query_builder = grade::Entity::find();
    if let Some(student_id) = query.student_id {
        query_builder = query_builder.filter(grade::Column::StudentId.eq(student_id));
    }
    if let Some(subject) = &query.subject {
        query_builder = query_builder.filter(grade::Column::Subject.eq(subject.as_str()));
    }
    if let Some(term) = &query.term {
        query_builder = query_builder.filter(grade::Column::Term.eq(term.as_str()));
    }
    if let Some(year) = query.year {
        query_builder = query_builder.filter(grade::Column::Year.eq(year));
    }

    let grades = query_builder
        .find_also_related(student::Entity)
        .order_by_desc(grade::Column::Year)
        .order_by_asc(grade::Column::Term)
        .order_by_asc(grade::Column::Subject)
        .order_by_asc(grade::Column::Id)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} grade(s)", grades.len());

    respond(
        StatusCode::OK,
        grades
            .into_iter()
            .map(|(grade, student)| GradeResponse::new(grade, student))
            .collect(),
        "Grades retrieved successfully",
    )
}

/// Get a grade by ID
#[utoipa::path(
    get,
    path = "/api/v1/grades/{grade_id}",
    tag = "grades",
    params(
        ("grade_id" = i32, Path, description = "Grade ID"),
    ),
    responses(
        (status = 200, description = "Grade retrieved successfully", body = ApiResponse<GradeResponse>),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_grade(
    Path(grade_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<GradeResponse> {
    let (grade, student) = grade::Entity::find_by_id(grade_id)
        .find_also_related(student::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            warn!("Grade with ID {} not found", grade_id);
            ApiError::not_found("Grade", grade_id)
        })?;

    respond(
        StatusCode::OK,
        GradeResponse::new(grade, student),
        "Grade retrieved successfully",
    )
}

/// Update a grade
#[utoipa::path(
    put,
    path = "/api/v1/grades/{grade_id}",
    tag = "grades",
    params(
        ("grade_id" = i32, Path, description = "Grade ID"),
    ),
    request_body = UpdateGradeRequest,
    responses(
        (status = 200, description = "Grade updated successfully", body = ApiResponse<GradeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_grade(
    Path(grade_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateGradeRequest>>,
) -> HandlerResult<GradeResponse> {
    trace!("Entering update_grade function for grade_id: {}", grade_id);
    let existing = grade::Entity::find_by_id(grade_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Grade", grade_id))?;

    let score = request.score.unwrap_or(existing.score);
    let letter = state.classifier.classify(&state.db, score).await;

    let mut active: grade::ActiveModel = existing.into();
    if let Some(subject) = request.subject {
        active.subject = Set(subject);
    }
    if let Some(term) = request.term {
        active.term = Set(term);
    }
    if let Some(year) = request.year {
        active.year = Set(year);
    }
    if let Some(remarks) = request.remarks {
        active.remarks = Set(Some(remarks));
    }
    active.score = Set(score);
    active.grade = Set(letter);

    let grade = active.update(&state.db).await?;
    let student = student::Entity::find_by_id(grade.student_id)
        .one(&state.db)
        .await?;
    info!("Grade {} updated to {} ({})", grade_id, grade.score, grade.grade);

    respond(
        StatusCode::OK,
        GradeResponse::new(grade, student),
        "Grade updated successfully",
    )
}

/// Delete a grade
#[utoipa::path(
    delete,
    path = "/api/v1/grades/{grade_id}",
    tag = "grades",
    params(
        ("grade_id" = i32, Path, description = "Grade ID"),
    ),
    responses(
        (status = 200, description = "Grade deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    Path(grade_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<String> {
    let result = grade::Entity::delete_by_id(grade_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        warn!("Grade with ID {} not found for deletion", grade_id);
        return Err(ApiError::not_found("Grade", grade_id).into());
    }

    info!("Grade with ID {} deleted successfully", grade_id);
    respond(
        StatusCode::OK,
        format!("Grade {} deleted", grade_id),
        "Grade deleted successfully",
    )
}
