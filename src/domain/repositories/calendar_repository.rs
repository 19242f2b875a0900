//! Repository trait for advent calendar persistence.

use crate::domain::entities::{AdventCalendar, Filter, NewAdventCalendar};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Persistence for advent calendars and their days.
///
/// Calendar reads resolve day entries with
/// [`EntryVisibility::IncludingRemoved`](super::EntryVisibility), so a day keeps
/// its entry after that entry leaves the live cellar.
///
/// Day arguments are truncated local midnights and are compared as instants.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCalendarRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_calendar.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Persists a calendar header and all of its days atomically.
    ///
    /// Either every day is written or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors, including a unique
    /// violation when the cellar already has a calendar with this name.
    async fn save(&self, calendar: NewAdventCalendar) -> Result<AdventCalendar, AppError>;

    /// Finds a calendar by id within a cellar.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_id(
        &self,
        cellar_id: i64,
        calendar_id: i64,
    ) -> Result<Option<AdventCalendar>, AppError>;

    /// Finds a calendar by its name within a cellar.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_name(
        &self,
        cellar_id: i64,
        name: &str,
    ) -> Result<Option<AdventCalendar>, AppError>;

    /// Finds the calendar whose date range contains `date`.
    ///
    /// If ranges overlap, the calendar starting first wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_for_date(
        &self,
        cellar_id: i64,
        date: DateTime<FixedOffset>,
    ) -> Result<Option<AdventCalendar>, AppError>;

    /// Returns the filter stored for one day.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn get_day_filter(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<Option<Filter>, AppError>;

    /// Points one day at a different entry and resets its reveal flag.
    ///
    /// Returns `Ok(false)` if the day does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn replace_day_entry(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
        entry_id: i64,
    ) -> Result<bool, AppError>;

    /// Sets a day's reveal flag to true. Idempotent.
    ///
    /// Returns `Ok(false)` if the day does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn set_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<bool, AppError>;

    /// Flips a day's reveal flag and returns the new value.
    ///
    /// Returns `Ok(None)` if the day does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn toggle_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<Option<bool>, AppError>;

    /// Deletes a calendar together with its days.
    ///
    /// Returns `Ok(false)` if no such calendar exists in the cellar.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn delete(&self, cellar_id: i64, calendar_id: i64) -> Result<bool, AppError>;
}
