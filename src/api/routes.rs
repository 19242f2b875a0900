//! API route configuration.

use crate::api::handlers::{
    cellar_stats_handler, create_calendar_handler, delete_calendar_handler, find_calendar_handler,
    get_calendar_handler, recommend_handler, recommendation_params_handler, regenerate_day_handler,
    remove_entry_handler, reveal_day_handler, toggle_reveal_handler, update_entry_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// All API routes, scoped to a cellar.
///
/// # Endpoints
///
/// - `POST   /cellars/{cellar_id}/advent-calendars`                                 - Build a calendar
/// - `GET    /cellars/{cellar_id}/advent-calendars?name=..|date=..`                 - Find a calendar
/// - `GET    /cellars/{cellar_id}/advent-calendars/{id}`                            - Get a calendar
/// - `DELETE /cellars/{cellar_id}/advent-calendars/{id}`                            - Delete a calendar
/// - `POST   /cellars/{cellar_id}/advent-calendars/{id}/days/{day}/regenerate`      - Re-pick one day
/// - `POST   /cellars/{cellar_id}/advent-calendars/{id}/days/{day}/reveal`          - Reveal one day
/// - `POST   /cellars/{cellar_id}/advent-calendars/{id}/days/{day}/toggle-reveal`   - Flip reveal state
/// - `POST   /cellars/{cellar_id}/recommendations`                                  - Ad-hoc recommendation
/// - `GET    /cellars/{cellar_id}/recommendation-params`                            - Filter bounds
/// - `GET    /cellars/{cellar_id}/stats`                                            - Inventory totals
/// - `PATCH  /cellars/{cellar_id}/entries/{entry_id}`                               - Update an entry
/// - `DELETE /cellars/{cellar_id}/entries/{entry_id}`                               - Remove an entry
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cellars/{cellar_id}/advent-calendars",
            post(create_calendar_handler).get(find_calendar_handler),
        )
        .route(
            "/cellars/{cellar_id}/advent-calendars/{id}",
            get(get_calendar_handler).delete(delete_calendar_handler),
        )
        .route(
            "/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/regenerate",
            post(regenerate_day_handler),
        )
        .route(
            "/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/reveal",
            post(reveal_day_handler),
        )
        .route(
            "/cellars/{cellar_id}/advent-calendars/{id}/days/{day}/toggle-reveal",
            post(toggle_reveal_handler),
        )
        .route(
            "/cellars/{cellar_id}/recommendations",
            post(recommend_handler),
        )
        .route(
            "/cellars/{cellar_id}/recommendation-params",
            get(recommendation_params_handler),
        )
        .route("/cellars/{cellar_id}/stats", get(cellar_stats_handler))
        .route(
            "/cellars/{cellar_id}/entries/{entry_id}",
            patch(update_entry_handler).delete(remove_entry_handler),
        )
}
