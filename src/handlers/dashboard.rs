use crate::handlers::fee_payments::RecentPaymentResponse;
use crate::handlers::settings::load_settings;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use axum_valid::Valid;
use common::DashboardCounts;
use compute::fees::recent_payments;
use compute::reports::dashboard_counts;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Number of recent payments (default: 5)
    #[validate(range(min = 1, max = 100))]
    pub recent: Option<u64>,
}

/// Administrator overview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub school_name: String,
    pub counts: DashboardCounts,
    /// Newest first
    pub recent_payments: Vec<RecentPaymentResponse>,
}

/// Head counts and the latest payments
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard loaded", body = ApiResponse<DashboardResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<DashboardResponse> {
    trace!("Entering get_dashboard function");
    let settings = load_settings(&state).await?;
    let counts = dashboard_counts(&state.db).await?;
    let payments = recent_payments(&state.db, query.recent.unwrap_or(5)).await?;
    debug!("Dashboard counts: {:?}", counts);

    respond(
        StatusCode::OK,
        DashboardResponse {
            school_name: settings.school_name,
            counts,
            recent_payments: payments.into_iter().map(RecentPaymentResponse::from).collect(),
        },
        "Dashboard loaded",
    )
}
