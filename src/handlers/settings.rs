use crate::helpers::errors::ApiError;
use crate::helpers::responses::{HandlerResult, respond};
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, SETTINGS_CACHE_KEY};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use compute::grading::{GradeBand, GradeThresholds, update_default_thresholds};
use model::entities::school_settings;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// School details shown on receipts and reports
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub school_name: String,
    pub school_address: Option<String>,
    pub school_phone: Option<String>,
    pub school_email: Option<String>,
}

impl From<school_settings::Model> for SettingsResponse {
    fn from(model: school_settings::Model) -> Self {
        Self {
            school_name: model.school_name,
            school_address: model.school_address,
            school_phone: model.school_phone,
            school_email: model.school_email,
        }
    }
}

/// Request body for updating the school details
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, max = 200))]
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub school_phone: Option<String>,
    #[validate(email)]
    pub school_email: Option<String>,
}

/// Inclusive score bands of the default grading table
///
/// Bands are stored as given: they may overlap or leave gaps. Scores outside
/// the A to D bands are an F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GradingThresholdsBody {
    pub min_a: i32,
    pub max_a: i32,
    pub min_b: i32,
    pub max_b: i32,
    pub min_c: i32,
    pub max_c: i32,
    pub min_d: i32,
    pub max_d: i32,
    pub min_f: i32,
    pub max_f: i32,
}

impl From<GradeThresholds> for GradingThresholdsBody {
    fn from(t: GradeThresholds) -> Self {
        Self {
            min_a: t.a.min,
            max_a: t.a.max,
            min_b: t.b.min,
            max_b: t.b.max,
            min_c: t.c.min,
            max_c: t.c.max,
            min_d: t.d.min,
            max_d: t.d.max,
            min_f: t.f.min,
            max_f: t.f.max,
        }
    }
}

impl From<GradingThresholdsBody> for GradeThresholds {
    fn from(body: GradingThresholdsBody) -> Self {
        Self {
            a: GradeBand::new(body.min_a, body.max_a),
            b: GradeBand::new(body.min_b, body.max_b),
            c: GradeBand::new(body.min_c, body.max_c),
            d: GradeBand::new(body.min_d, body.max_d),
            f: GradeBand::new(body.min_f, body.max_f),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ClassifyQuery {
    #[param(value_type = String, example = "79.5")]
    #[schema(value_type = String)]
    pub score: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResponse {
    #[schema(value_type = String, example = "79.5")]
    pub score: Decimal,
    #[schema(example = "F")]
    pub grade: String,
}

/// Reads the settings singleton through the cache, creating the row when it
/// is missing.
pub async fn load_settings(state: &AppState) -> Result<school_settings::Model, ApiError> {
    if let Some(CachedData::Settings(settings)) = state.cache.get(SETTINGS_CACHE_KEY).await {
        trace!("School settings served from cache");
        return Ok(settings);
    }

    let settings = match school_settings::Entity::find_by_id(school_settings::SINGLETON_ID)
        .one(&state.db)
        .await?
    {
        Some(settings) => settings,
        None => {
            warn!("School settings row missing, creating defaults");
            school_settings::ActiveModel {
                id: Set(school_settings::SINGLETON_ID),
                school_name: Set(school_settings::DEFAULT_SCHOOL_NAME.to_string()),
                ..Default::default()
            }
            .insert(&state.db)
            .await?
        }
    };

    state
        .cache
        .insert(
            SETTINGS_CACHE_KEY.to_string(),
            CachedData::Settings(settings.clone()),
        )
        .await;
    Ok(settings)
}

/// Get the school details
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Settings retrieved successfully", body = ApiResponse<SettingsResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> HandlerResult<SettingsResponse> {
    let settings = load_settings(&state).await?;
    respond(
        StatusCode::OK,
        SettingsResponse::from(settings),
        "Settings retrieved successfully",
    )
}

/// Update the school details
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated successfully", body = ApiResponse<SettingsResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_settings(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateSettingsRequest>>,
) -> HandlerResult<SettingsResponse> {
    trace!("Entering update_settings function");
    let current = load_settings(&state).await?;

    let mut active: school_settings::ActiveModel = current.into();
    if let Some(name) = request.school_name {
        active.school_name = Set(name);
    }
    if let Some(address) = request.school_address {
        active.school_address = Set(Some(address));
    }
    if let Some(phone) = request.school_phone {
        active.school_phone = Set(Some(phone));
    }
    if let Some(email) = request.school_email {
        active.school_email = Set(Some(email));
    }

    let updated = active.update(&state.db).await;
    // Drop the cached row even when the write failed.
    state.cache.invalidate(SETTINGS_CACHE_KEY).await;
    let updated = updated?;
    info!("School settings updated: {}", updated.school_name);

    respond(
        StatusCode::OK,
        SettingsResponse::from(updated),
        "Settings updated successfully",
    )
}

/// Get the thresholds in effect
#[utoipa::path(
    get,
    path = "/api/v1/settings/grading",
    tag = "settings",
    responses(
        (status = 200, description = "Grading thresholds retrieved successfully", body = ApiResponse<GradingThresholdsBody>),
    )
)]
#[instrument(skip(state))]
pub async fn get_grading_settings(
    State(state): State<AppState>,
) -> HandlerResult<GradingThresholdsBody> {
    let thresholds = state.classifier.current_thresholds(&state.db).await;
    respond(
        StatusCode::OK,
        GradingThresholdsBody::from(thresholds),
        "Grading thresholds retrieved successfully",
    )
}

/// Replace the default thresholds
///
/// Applies to grades classified from now on. Stored letters are not changed.
#[utoipa::path(
    put,
    path = "/api/v1/settings/grading",
    tag = "settings",
    request_body = GradingThresholdsBody,
    responses(
        (status = 200, description = "Grading thresholds updated successfully", body = ApiResponse<GradingThresholdsBody>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_grading_settings(
    State(state): State<AppState>,
    Json(request): Json<GradingThresholdsBody>,
) -> HandlerResult<GradingThresholdsBody> {
    let saved = update_default_thresholds(&state.db, GradeThresholds::from(request)).await?;
    debug!("Grading system {} is now the default", saved.id);

    respond(
        StatusCode::OK,
        GradingThresholdsBody::from(GradeThresholds::from(&saved)),
        "Grading thresholds updated successfully",
    )
}

/// Classify a score against the thresholds in effect
#[utoipa::path(
    get,
    path = "/api/v1/grading/classify",
    tag = "grades",
    params(ClassifyQuery),
    responses(
        (status = 200, description = "Score classified", body = ApiResponse<ClassificationResponse>),
        (status = 400, description = "Missing or malformed score", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn classify_score(
    Valid(Query(query)): Valid<Query<ClassifyQuery>>,
    State(state): State<AppState>,
) -> HandlerResult<ClassificationResponse> {
    let letter = state.classifier.classify(&state.db, query.score).await;
    respond(
        StatusCode::OK,
        ClassificationResponse {
            score: query.score,
            grade: letter.to_string(),
        },
        "Score classified",
    )
}
