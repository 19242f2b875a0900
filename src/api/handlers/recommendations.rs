//! Handlers for ad-hoc recommendations.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::entry::CellarEntryResponse;
use crate::api::dto::filter::FilterRequest;
use crate::api::dto::recommendation::RecommendationParamsResponse;
use crate::domain::entities::Filter;
use crate::error::AppError;
use crate::state::AppState;

/// Recommends one live entry matching the filter.
///
/// # Endpoint
///
/// `POST /api/cellars/{cellar_id}/recommendations`
///
/// # Response Codes
///
/// - **200 OK**: the recommended entry
/// - **204 No Content**: nothing in the cellar matches
/// - **400 Bad Request**: invalid filter
pub async fn recommend_handler(
    State(state): State<AppState>,
    Path(cellar_id): Path<i64>,
    Json(payload): Json<FilterRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let filter = Filter::from(payload);

    let response = match state
        .recommendation_service
        .recommend(cellar_id, &filter)
        .await?
    {
        Some(entry) => Json(CellarEntryResponse::from(entry)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

/// Returns the breweries, styles and value ranges present in the cellar.
///
/// # Endpoint
///
/// `GET /api/cellars/{cellar_id}/recommendation-params`
pub async fn recommendation_params_handler(
    State(state): State<AppState>,
    Path(cellar_id): Path<i64>,
) -> Result<Json<RecommendationParamsResponse>, AppError> {
    let params = state
        .recommendation_service
        .recommendation_params(cellar_id)
        .await?;

    Ok(Json(params.into()))
}
