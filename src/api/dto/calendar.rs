//! DTOs for advent calendar endpoints.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entry::CellarEntryResponse;
use super::filter::FilterRequest;
use crate::application::services::CreateCalendar;
use crate::domain::entities::{AdventCalendar, AdventCalendarDay, Filter};

/// Request to build a new advent calendar.
///
/// Dates are RFC 3339 timestamps. They are truncated to midnight in their own
/// offset, and `filters` holds one entry per day from start to end inclusive.
///
/// ```json
/// {
///   "name": "Christmas 2024",
///   "start_date": "2024-12-01T00:00:00+01:00",
///   "end_date": "2024-12-24T00:00:00+01:00",
///   "filters": [{ "minimum_abv": 8.0 }, ...]
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCalendarRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    pub start_date: DateTime<FixedOffset>,

    pub end_date: DateTime<FixedOffset>,

    #[validate(nested)]
    pub filters: Vec<FilterRequest>,
}

impl CreateCalendarRequest {
    pub fn into_command(self, cellar_id: i64) -> CreateCalendar {
        CreateCalendar {
            cellar_id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            filters: self.filters.into_iter().map(Filter::from).collect(),
        }
    }
}

/// Query for looking a calendar up by name or by a date it contains.
///
/// Exactly one of the two must be given. `date` is parsed as RFC 3339; a `+`
/// in the offset must be sent percent-encoded.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub id: i64,
    pub cellar_id: i64,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub created_at: DateTime<Utc>,
    pub days: Vec<CalendarDayResponse>,
}

#[derive(Debug, Serialize)]
pub struct CalendarDayResponse {
    pub id: i64,
    pub day: DateTime<FixedOffset>,
    pub revealed: bool,
    pub filter: Filter,
    pub entry: CellarEntryResponse,
}

/// Reveal state of a day after a toggle.
#[derive(Debug, Serialize)]
pub struct RevealResponse {
    pub day: DateTime<FixedOffset>,
    pub revealed: bool,
}

impl From<AdventCalendar> for CalendarResponse {
    fn from(calendar: AdventCalendar) -> Self {
        Self {
            id: calendar.id,
            cellar_id: calendar.cellar_id,
            name: calendar.name,
            description: calendar.description,
            start_date: calendar.start_date,
            end_date: calendar.end_date,
            created_at: calendar.created_at,
            days: calendar
                .days
                .into_iter()
                .map(CalendarDayResponse::from)
                .collect(),
        }
    }
}

impl From<AdventCalendarDay> for CalendarDayResponse {
    fn from(day: AdventCalendarDay) -> Self {
        Self {
            id: day.id,
            day: day.day,
            revealed: day.revealed,
            filter: day.filter,
            entry: day.entry.into(),
        }
    }
}
