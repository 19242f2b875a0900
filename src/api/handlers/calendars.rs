//! Handlers for advent calendar endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, FixedOffset};
use serde_json::json;
use validator::Validate;

use crate::api::dto::calendar::{
    CalendarDayResponse, CalendarQuery, CalendarResponse, CreateCalendarRequest, RevealResponse,
};
use crate::domain::dates::truncate_to_day;
use crate::domain::entities::CalendarLookup;
use crate::error::AppError;
use crate::state::AppState;

/// Builds and stores a new advent calendar.
///
/// # Endpoint
///
/// `POST /api/cellars/{cellar_id}/advent-calendars`
///
/// # Errors
///
/// - 400 if validation fails or the filter count differs from the day count
/// - 409 if the cellar already has a calendar with this name
/// - 422 if some day has no candidate, or only candidates used by earlier days
pub async fn create_calendar_handler(
    State(state): State<AppState>,
    Path(cellar_id): Path<i64>,
    Json(payload): Json<CreateCalendarRequest>,
) -> Result<(StatusCode, Json<CalendarResponse>), AppError> {
    payload.validate()?;

    let calendar = state
        .calendar_service
        .create_calendar(payload.into_command(cellar_id))
        .await?;

    Ok((StatusCode::CREATED, Json(calendar.into())))
}

/// Returns a calendar with all of its days.
///
/// # Endpoint
///
/// `GET /api/cellars/{cellar_id}/advent-calendars/{id}`
pub async fn get_calendar_handler(
    State(state): State<AppState>,
    Path((cellar_id, calendar_id)): Path<(i64, i64)>,
) -> Result<Json<CalendarResponse>, AppError> {
    let calendar = state
        .calendar_service
        .get_calendar(cellar_id, CalendarLookup::Id(calendar_id))
        .await?;

    Ok(Json(calendar.into()))
}

/// Finds a calendar by name or by a date within its range.
///
/// # Endpoint
///
/// `GET /api/cellars/{cellar_id}/advent-calendars?name=...`
/// `GET /api/cellars/{cellar_id}/advent-calendars?date=...`
///
/// # Errors
///
/// Returns 400 unless exactly one of `name` and `date` is given, or if `date`
/// is not RFC 3339.
pub async fn find_calendar_handler(
    State(state): State<AppState>,
    Path(cellar_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let lookup = match (query.name, query.date) {
        (Some(name), None) => CalendarLookup::Name(name),
        (None, Some(date)) => CalendarLookup::ContainingDate(parse_date("date", &date)?),
        _ => {
            return Err(AppError::bad_request(
                "Exactly one of 'name' or 'date' is required",
                json!({}),
            ));
        }
    };

    let calendar = state.calendar_service.get_calendar(cellar_id, lookup).await?;

    Ok(Json(calendar.into()))
}

/// Picks a new entry for one day, using the day's stored filter.
///
/// # Endpoint
///
/// `POST /api/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/regenerate`
///
/// `day` is an RFC 3339 timestamp; any time of day selects that date.
///
/// # Errors
///
/// - 404 if the calendar or day does not exist
/// - 422 if every matching entry is already used in the calendar
pub async fn regenerate_day_handler(
    State(state): State<AppState>,
    Path((cellar_id, calendar_id, day)): Path<(i64, i64, String)>,
) -> Result<Json<CalendarDayResponse>, AppError> {
    let day = parse_date("day", &day)?;

    let regenerated = state
        .calendar_service
        .regenerate_day(cellar_id, calendar_id, day)
        .await?;

    Ok(Json(regenerated.into()))
}

/// Marks a day as revealed. Repeating the call has no further effect.
///
/// # Endpoint
///
/// `POST /api/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/reveal`
///
/// Returns 204 No Content.
pub async fn reveal_day_handler(
    State(state): State<AppState>,
    Path((cellar_id, calendar_id, day)): Path<(i64, i64, String)>,
) -> Result<StatusCode, AppError> {
    let day = parse_date("day", &day)?;

    state
        .calendar_service
        .mark_day_revealed(cellar_id, calendar_id, day)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Flips a day's reveal flag.
///
/// # Endpoint
///
/// `POST /api/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/toggle-reveal`
///
/// # Response
///
/// ```json
/// { "day": "2024-12-05T00:00:00+01:00", "revealed": true }
/// ```
pub async fn toggle_reveal_handler(
    State(state): State<AppState>,
    Path((cellar_id, calendar_id, day)): Path<(i64, i64, String)>,
) -> Result<Json<RevealResponse>, AppError> {
    let day = parse_date("day", &day)?;

    let revealed = state
        .calendar_service
        .toggle_day_revealed(cellar_id, calendar_id, day)
        .await?;

    Ok(Json(RevealResponse {
        day: truncate_to_day(day),
        revealed,
    }))
}

/// Deletes a calendar and its days.
///
/// # Endpoint
///
/// `DELETE /api/cellars/{cellar_id}/advent-calendars/{id}`
///
/// Returns 204 No Content, or 404 if the calendar does not exist.
pub async fn delete_calendar_handler(
    State(state): State<AppState>,
    Path((cellar_id, calendar_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .calendar_service
        .delete_calendar(cellar_id, calendar_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_date(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        AppError::bad_request(
            format!("Invalid {field}: expected an RFC 3339 timestamp"),
            json!({ "field": field, "value": raw, "reason": e.to_string() }),
        )
    })
}
