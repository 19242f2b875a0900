//! Handlers for cellar inventory endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::cellar::{CellarStatsResponse, UpdateEntryRequest};
use crate::api::dto::entry::CellarEntryResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns inventory totals over the cellar's live entries.
///
/// # Endpoint
///
/// `GET /api/cellars/{cellar_id}/stats`
pub async fn cellar_stats_handler(
    State(state): State<AppState>,
    Path(cellar_id): Path<i64>,
) -> Result<Json<CellarStatsResponse>, AppError> {
    let stats = state.cellar_service.cellar_stats(cellar_id).await?;

    Ok(Json(stats.into()))
}

/// Changes fields of a cellar entry.
///
/// # Endpoint
///
/// `PATCH /api/cellars/{cellar_id}/entries/{entry_id}`
///
/// # Response Codes
///
/// - **200 OK**: the updated entry
/// - **204 No Content**: quantity was set to 0 and the entry left the cellar
/// - **400 Bad Request**: invalid body
/// - **404 Not Found**: no live entry with this id in the cellar
pub async fn update_entry_handler(
    State(state): State<AppState>,
    Path((cellar_id, entry_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let response = match state
        .cellar_service
        .update_entry(cellar_id, entry_id, payload.into())
        .await?
    {
        Some(entry) => Json(CellarEntryResponse::from(entry)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

/// Removes an entry from the cellar.
///
/// # Endpoint
///
/// `DELETE /api/cellars/{cellar_id}/entries/{entry_id}`
///
/// Returns 204 No Content, or 404 if there is no live entry with this id.
pub async fn remove_entry_handler(
    State(state): State<AppState>,
    Path((cellar_id, entry_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .cellar_service
        .remove_entry(cellar_id, entry_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
