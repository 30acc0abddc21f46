use crate::handlers::settings::load_settings;
use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use common::ReceiptBreakdown;
use compute::fees::recent_payments;
use compute::lookup::{find_fee_payment, find_fee_structure, find_student};
use model::entities::fee_payment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_payment_method() -> String {
    "Cash".to_string()
}

/// Request body for recording a payment
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateFeePaymentRequest {
    pub student_id: i32,
    pub fee_structure_id: i32,
    /// Stored as given, zero and negative amounts included
    #[schema(value_type = String, example = "400")]
    pub amount_paid: Decimal,
    /// Defaults to `Cash`
    #[serde(default = "default_payment_method")]
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    pub remarks: Option<String>,
}

/// Query parameters for listing recent payments
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct FeePaymentQuery {
    /// Number of payments (default: 20)
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

/// Payment response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeePaymentResponse {
    pub id: i32,
    pub student_id: i32,
    pub fee_structure_id: i32,
    #[schema(value_type = String, example = "400")]
    pub amount_paid: Decimal,
    pub date_paid: NaiveDate,
    /// `RCPT-YYYYMMDD-XXXXXX`
    pub receipt_number: String,
    pub payment_method: String,
    pub remarks: Option<String>,
}

impl From<fee_payment::Model> for FeePaymentResponse {
    fn from(model: fee_payment::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            fee_structure_id: model.fee_structure_id,
            amount_paid: model.amount_paid,
            date_paid: model.date_paid,
            receipt_number: model.receipt_number,
            payment_method: model.payment_method,
            remarks: model.remarks,
        }
    }
}

/// A payment with the paying student's name
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecentPaymentResponse {
    #[serde(flatten)]
    pub payment: FeePaymentResponse,
    pub student_name: Option<String>,
    pub admission_number: Option<String>,
}

/// Everything printed on a receipt
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptResponse {
    pub school_name: String,
    pub school_address: Option<String>,
    pub school_phone: Option<String>,
    pub payment: FeePaymentResponse,
    pub student_name: String,
    pub admission_number: String,
    pub class: Option<String>,
    pub term: String,
    pub year: i32,
    pub fee_description: Option<String>,
    pub breakdown: ReceiptBreakdown,
}

/// Record a fee payment and issue its receipt number
#[utoipa::path(
    post,
    path = "/api/v1/fee-payments",
    tag = "fees",
    request_body = CreateFeePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<FeePaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Student or fee structure not found", body = ErrorResponse),
        (status = 409, description = "No unique receipt number could be allocated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_fee_payment(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateFeePaymentRequest>>,
) -> HandlerResult<FeePaymentResponse> {
    trace!("Entering create_fee_payment function");
    debug!(
        "Recording {} for student {} on fee structure {}",
        request.amount_paid, request.student_id, request.fee_structure_id
    );

    match state
        .ledger
        .record_payment(
            &state.db,
            request.student_id,
            request.fee_structure_id,
            request.amount_paid,
            &request.payment_method,
            request.remarks,
        )
        .await
    {
        Ok(payment) => {
            info!(
                "Payment {} recorded with receipt {}",
                payment.id, payment.receipt_number
            );
            respond(
                StatusCode::CREATED,
                FeePaymentResponse::from(payment),
                "Payment recorded successfully",
            )
        }
        Err(e) => {
            error!("Failed to record payment: {}", e);
            Err(ApiError::from(e).into())
        }
    }
}

/// Most recent payments across all students
#[utoipa::path(
    get,
    path = "/api/v1/fee-payments",
    tag = "fees",
    params(FeePaymentQuery),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<RecentPaymentResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_fee_payments(
    Valid(Query(query)): Valid<Query<FeePaymentQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<Vec<RecentPaymentResponse>> {
    trace!("Entering get_fee_payments function");
    let payments = recent_payments(&state.db, query.limit.unwrap_or(20)).await?;
    info!("Retrieved {} payment(s)", payments.len());

    respond(
        StatusCode::OK,
        payments.into_iter().map(RecentPaymentResponse::from).collect(),
        "Payments retrieved successfully",
    )
}

impl From<(fee_payment::Model, Option<model::entities::student::Model>)> for RecentPaymentResponse {
    fn from((payment, student): (fee_payment::Model, Option<model::entities::student::Model>)) -> Self {
        let (student_name, admission_number) = match student {
            Some(student) => (Some(student.name), Some(student.admission_number)),
            None => (None, None),
        };
        Self {
            payment: payment.into(),
            student_name,
            admission_number,
        }
    }
}

/// Receipt of one payment with the balance before and after it
#[utoipa::path(
    get,
    path = "/api/v1/fee-payments/{payment_id}/receipt",
    tag = "fees",
    params(
        ("payment_id" = i32, Path, description = "Payment ID"),
    ),
    responses(
        (status = 200, description = "Receipt retrieved successfully", body = ApiResponse<ReceiptResponse>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_fee_payment_receipt(
    Path(payment_id): Path<i32>,
    State(state): State<AppState>,
) -> HandlerResult<ReceiptResponse> {
    trace!("Entering get_fee_payment_receipt function for payment_id: {}", payment_id);

    let payment = find_fee_payment(&state.db, payment_id).await?;
    let student = find_student(&state.db, payment.student_id).await?;
    let structure = find_fee_structure(&state.db, payment.fee_structure_id).await?;
    let breakdown = state.ledger.receipt_breakdown(&state.db, payment_id).await?;

    let settings = match load_settings(&state).await {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Printing receipt without school details: {}", e);
            None
        }
    };

    debug!("Receipt {} for {}", payment.receipt_number, student.name);
    let response = ReceiptResponse {
        school_name: settings
            .as_ref()
            .map(|s| s.school_name.clone())
            .unwrap_or_else(|| model::entities::school_settings::DEFAULT_SCHOOL_NAME.to_string()),
        school_address: settings.as_ref().and_then(|s| s.school_address.clone()),
        school_phone: settings.as_ref().and_then(|s| s.school_phone.clone()),
        payment: payment.into(),
        student_name: student.name,
        admission_number: student.admission_number,
        class: student.class,
        term: structure.term,
        year: structure.year,
        fee_description: structure.description,
        breakdown,
    };

    respond(StatusCode::OK, response, "Receipt retrieved successfully")
}
