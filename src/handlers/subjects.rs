use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode};
use model::entities::subject;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubjectResponse {
    pub id: i32,
    pub name: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(model: subject::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// List subjects by name
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    tag = "subjects",
    responses(
        (status = 200, description = "Subjects retrieved successfully", body = ApiResponse<Vec<SubjectResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_subjects(State(state): State<AppState>) -> HandlerResult<Vec<SubjectResponse>> {
    let subjects = subject::Entity::find()
        .order_by_asc(subject::Column::Name)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} subject(s)", subjects.len());

    respond(
        StatusCode::OK,
        subjects.into_iter().map(SubjectResponse::from).collect(),
        "Subjects retrieved successfully",
    )
}
