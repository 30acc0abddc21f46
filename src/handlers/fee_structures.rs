use crate::helpers::errors::{ApiError, is_unique_violation};
use crate::helpers::responses::{HandlerError, HandlerResult, error_response, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::fees::delete_fee_structure as delete_unpaid_fee_structure;
use compute::lookup::find_fee_structure;
use model::entities::fee_structure;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a fee structure
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFeeStructureRequest {
    /// Class name the fee applies to
    #[validate(length(min = 1, max = 100))]
    pub class: String,
    #[validate(length(min = 1, max = 50))]
    pub term: String,
    #[validate(range(min = 1900, max = 2200))]
    pub year: i32,
    #[schema(value_type = String, example = "15000")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Request body for updating a fee structure
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateFeeStructureRequest {
    #[validate(length(min = 1, max = 100))]
    pub class: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub term: Option<String>,
    #[validate(range(min = 1900, max = 2200))]
    pub year: Option<i32>,
    #[schema(value_type = Option<String>, example = "15000")]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Query parameters for listing fee structures
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct FeeStructureQuery {
    pub class: Option<String>,
    pub term: Option<String>,
    pub year: Option<i32>,
}

/// Fee structure response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeStructureResponse {
    pub id: i32,
    pub class: String,
    pub term: String,
    pub year: i32,
    #[schema(value_type = String, example = "15000")]
    pub amount: Decimal,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

impl From<fee_structure::Model> for FeeStructureResponse {
    fn from(model: fee_structure::Model) -> Self {
        Self {
            id: model.id,
            class: model.class,
            term: model.term,
            year: model.year,
            amount: model.amount,
            description: model.description,
            due_date: model.due_date,
        }
    }
}

fn duplicate_structure(class: &str, term: &str, year: i32) -> HandlerError {
    warn!("Fee structure for {} {} {} already exists", class, term, year);
    error_response(
        StatusCode::CONFLICT,
        "DUPLICATE_FEE_STRUCTURE",
        format!("A fee structure for {class}, {term} {year} already exists"),
    )
}

fn save_error(e: DbErr, class: &str, term: &str, year: i32) -> HandlerError {
    if is_unique_violation(&e) {
        return duplicate_structure(class, term, year);
    }
    error!("Failed to save fee structure: {}", e);
    ApiError::from(e).into()
}

/// Create a fee structure
#[utoipa::path(
    post,
    path = "/api/v1/fee-structures",
    tag = "fees",
    request_body = CreateFeeStructureRequest,
    responses(
        (status = 201, description = "Fee structure created successfully", body = ApiResponse<FeeStructureResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "A fee structure for the class, term and year exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_fee_structure(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateFeeStructureRequest>>,
) -> HandlerResult<FeeStructureResponse> {
    trace!("Entering create_fee_structure function");

    let new_structure = fee_structure::ActiveModel {
        class: Set(request.class.clone()),
        term: Set(request.term.clone()),
        year: Set(request.year),
        amount: Set(request.amount),
        description: Set(request.description),
        due_date: Set(request.due_date),
        ..Default::default()
    };

    match new_structure.insert(&state.db).await {
        Ok(structure) => {
            info!("Fee structure created successfully with ID: {}", structure.id);
            respond(
                StatusCode::CREATED,
                FeeStructureResponse::from(structure),
                "Fee structure created successfully",
            )
        }
        Err(e) => Err(save_error(e, &request.class, &request.term, request.year)),
    }
}

/// List fee structures, newest year first
#[utoipa::path(
    get,
    path = "/api/v1/fee-structures",
    tag = "fees",
    params(FeeStructureQuery),
    responses(
        (status = 200, description = "Fee structures retrieved successfully", body = ApiResponse<Vec<FeeStructureResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_fee_structures(
    Valid(Query(query)): Valid<Query<FeeStructureQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<FeeStructureResponse>> {
    trace!("Entering get_fee_structures function");

    let mut query_builder = fee_structure::Entity::find();
    if let Some(class) = &query.class {
        query_builder = query_builder.filter(fee_structure::Column::Class.eq(class.as_str()));
    }
    if let Some(term) = &query.term {
        query_builder = query_builder.filter(fee_structure::Column::Term.eq(term.as_str()));
    }
    if let Some(year) = query.year {
        query_builder = query_builder.filter(fee_structure::Column::Year.eq(year));
    }

    let structures = query_builder
        .order_by_desc(fee_structure::Column::Year)
        .order_by_asc(fee_structure::Column::Class)
        .order_by_asc(fee_structure::Column::Term)
        .all(&state.db)
        .await?;
    debug!("Retrieved {} fee structure(s)", structures.len());

    respond(
        StatusCode::OK,
        structures.into_iter().map(FeeStructureResponse::from).collect(),
        "Fee structures retrieved successfully",
    )
}

/// Get a fee structure by ID
#[utoipa::path(
    get,
    path = "/api/v1/fee-structures/{fee_structure_id}",
    tag = "fees",
    params(
        ("fee_structure_id" = i32, Path, description = "Fee structure ID"),
    ),
    responses(
        (status = 200, description = "Fee structure retrieved successfully", body = ApiResponse<FeeStructureResponse>),
        (status = 404, description = "Fee structure not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_fee_structure(
    Path(fee_structure_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<FeeStructureResponse> {
    let structure = find_fee_structure(&state.db, fee_structure_id).await?;
    respond(
        StatusCode::OK,
        FeeStructureResponse::from(structure),
        "Fee structure retrieved successfully",
    )
}

/// Update a fee structure
///
/// Balances of every student of the class follow the new amount at once.
#[utoipa::path(
    put,
    path = "/api/v1/fee-structures/{fee_structure_id}",
    tag = "fees",
    params(
        ("fee_structure_id" = i32, Path, description = "Fee structure ID"),
    ),
    request_body = UpdateFeeStructureRequest,
    responses(
        (status = 200, description = "Fee structure updated successfully", body = ApiResponse<FeeStructureResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Fee structure not found", body = ErrorResponse),
        (status = 409, description = "A fee structure for the class, term and year exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_fee_structure(
    Path(fee_structure_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateFeeStructureRequest>>,
) -> HandlerResult<FeeStructureResponse> {
    trace!("Entering update_fee_structure function for fee_structure_id: {}", fee_structure_id);
    let structure = find_fee_structure(&state.db, fee_structure_id).await?;

    let class = request.class.unwrap_or_else(|| structure.class.clone());
    let term = request.term.unwrap_or_else(|| structure.term.clone());
    let year = request.year.unwrap_or(structure.year);

    let mut active: fee_structure::ActiveModel = structure.into();
    active.class = Set(class.clone());
    active.term = Set(term.clone());
    active.year = Set(year);
    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(due_date) = request.due_date {
        active.due_date = Set(Some(due_date));
    }

    match active.update(&state.db).await {
        Ok(structure) => {
            info!("Fee structure {} updated successfully", fee_structure_id);
            respond(
                StatusCode::OK,
                FeeStructureResponse::from(structure),
                "Fee structure updated successfully",
            )
        }
        Err(e) => Err(save_error(e, &class, &term, year)),
    }
}

/// Delete a fee structure that has no payments
#[utoipa::path(
    delete,
    path = "/api/v1/fee-structures/{fee_structure_id}",
    tag = "fees",
    params(
        ("fee_structure_id" = i32, Path, description = "Fee structure ID"),
    ),
    responses(
        (status = 200, description = "Fee structure deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Fee structure not found", body = ErrorResponse),
        (status = 409, description = "Payments are recorded against the fee structure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_fee_structure(
    Path(fee_structure_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<String> {
    trace!("Entering delete_fee_structure function for fee_structure_id: {}", fee_structure_id);
    delete_unpaid_fee_structure(&state.db, fee_structure_id).await?;
    respond(
        StatusCode::OK,
        format!("Fee structure {} deleted", fee_structure_id),
        "Fee structure deleted successfully",
    )
}
