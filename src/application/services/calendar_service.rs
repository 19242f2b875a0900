//! Advent calendar creation, regeneration, reveal and lookup.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rand::rngs::StdRng;
use serde_json::json;

use crate::domain::clock::Clock;
use crate::domain::dates::{anchor_to_offset, days_inclusive, inclusive_day_count, truncate_to_day};
use crate::domain::entities::{
    AdventCalendar, AdventCalendarDay, CalendarLookup, CellarEntry, Filter, NewAdventCalendar,
    NewAdventCalendarDay,
};
use crate::domain::filter_compiler::compile;
use crate::domain::repositories::{CalendarRepository, CellarRepository};
use crate::domain::rng::RngSource;
use crate::domain::selector::select;
use crate::error::AppError;

/// Input for [`CalendarService::create_calendar`].
///
/// Dates may carry any time of day and any offset; they are truncated to local
/// midnight in that offset before use. The calendar takes the start date's
/// offset and the end date keeps the local date it was given in.
#[derive(Debug, Clone)]
pub struct CreateCalendar {
    pub cellar_id: i64,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    /// One filter per day, in date order.
    pub filters: Vec<Filter>,
}

/// Service orchestrating advent calendars over a cellar.
///
/// Holds no mutable state between calls. Each operation takes a fresh RNG from
/// its [`RngSource`] and reads "now" from its [`Clock`] once.
///
/// Within a calendar no two days reference the same cellar entry. Creation
/// either persists every day or nothing, and regeneration only ever touches
/// the one day it targets.
pub struct CalendarService<C: CellarRepository, A: CalendarRepository> {
    cellar_repository: Arc<C>,
    calendar_repository: Arc<A>,
    rng_source: Arc<dyn RngSource>,
    clock: Arc<dyn Clock>,
}

impl<C: CellarRepository, A: CalendarRepository> CalendarService<C, A> {
    /// Creates a new calendar service.
    pub fn new(
        cellar_repository: Arc<C>,
        calendar_repository: Arc<A>,
        rng_source: Arc<dyn RngSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cellar_repository,
            calendar_repository,
            rng_source,
            clock,
        }
    }

    /// Builds a calendar day by day and persists it as one unit.
    ///
    /// For each date from start to end inclusive, the matching filter is
    /// compiled, candidates are fetched and one is selected that no earlier day
    /// of this build already holds. The first day that cannot be filled aborts
    /// the build and nothing is written.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the end date precedes the start date or the
    ///   filter count differs from the day count (checked before any fetch)
    /// - [`AppError::NoCandidates`] / [`AppError::NoUniqueCandidate`] for the
    ///   first day that cannot be filled
    /// - [`AppError::Storage`] on database errors, including a duplicate name
    pub async fn create_calendar(&self, request: CreateCalendar) -> Result<AdventCalendar, AppError> {
        let start_date = truncate_to_day(request.start_date);
        let end_date = anchor_to_offset(request.end_date, *start_date.offset());

        let days = self
            .assign_days(request.cellar_id, start_date, end_date, &request.filters)
            .await?;

        let calendar = self
            .calendar_repository
            .save(NewAdventCalendar {
                cellar_id: request.cellar_id,
                name: request.name,
                description: request.description,
                start_date,
                end_date,
                days,
            })
            .await?;

        tracing::info!(
            cellar_id = calendar.cellar_id,
            calendar_id = calendar.id,
            days = calendar.days.len(),
            "Advent calendar created"
        );

        Ok(calendar)
    }

    /// Assigns one unique entry per day without persisting anything.
    async fn assign_days(
        &self,
        cellar_id: i64,
        start_date: DateTime<FixedOffset>,
        end_date: DateTime<FixedOffset>,
        filters: &[Filter],
    ) -> Result<Vec<NewAdventCalendarDay>, AppError> {
        if end_date < start_date {
            return Err(AppError::bad_request(
                "End date must not be before start date",
                json!({
                    "start_date": start_date.to_rfc3339(),
                    "end_date": end_date.to_rfc3339(),
                }),
            ));
        }

        let day_count = inclusive_day_count(start_date, end_date);
        if filters.len() != day_count {
            return Err(AppError::bad_request(
                "Filter count must match day count",
                json!({ "days": day_count, "filters": filters.len() }),
            ));
        }

        let dates = days_inclusive(start_date, end_date);

        let now = self.clock.now();
        let mut rng = self.rng_source.rng();
        let mut used = HashSet::with_capacity(dates.len());
        let mut days = Vec::with_capacity(dates.len());

        for (day, filter) in dates.into_iter().zip(filters) {
            let entry = self
                .unique_recommendation(cellar_id, day, filter, now, &used, &mut rng)
                .await?;

            tracing::debug!(cellar_id, day = %day, entry_id = entry.id, "Day assigned");

            used.insert(entry.id);
            days.push(NewAdventCalendarDay {
                day,
                cellar_entry_id: entry.id,
                filter: filter.clone(),
            });
        }

        Ok(days)
    }

    /// Compiles, fetches and selects one entry outside `excluded`.
    async fn unique_recommendation(
        &self,
        cellar_id: i64,
        day: DateTime<FixedOffset>,
        filter: &Filter,
        now: DateTime<Utc>,
        excluded: &HashSet<i64>,
        rng: &mut StdRng,
    ) -> Result<CellarEntry, AppError> {
        let predicate = compile(filter, now);
        let candidates = self
            .cellar_repository
            .fetch_candidates(cellar_id, &predicate)
            .await?;

        match select(&candidates, excluded, rng) {
            Ok(entry) => Ok(entry.clone()),
            Err(e) => {
                tracing::warn!(
                    cellar_id,
                    day = %day,
                    candidates = candidates.len(),
                    reason = %e,
                    "No recommendation for day"
                );
                Err(AppError::from_selection(
                    e,
                    json!({
                        "cellar_id": cellar_id,
                        "day": day.to_rfc3339(),
                        "filter": filter,
                    }),
                ))
            }
        }
    }

    /// Picks a new entry for one day of an existing calendar.
    ///
    /// The day's stored filter is re-run, excluding every entry currently
    /// assigned anywhere in the calendar, including the one this day holds.
    /// Only the target day is updated and its reveal flag is reset.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the calendar, day or stored filter is missing
    /// - [`AppError::NoCandidates`] / [`AppError::NoUniqueCandidate`] if no
    ///   replacement exists; the calendar is left unchanged
    /// - [`AppError::Storage`] on database errors
    pub async fn regenerate_day(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<AdventCalendarDay, AppError> {
        let day = truncate_to_day(day);
        let not_found_details =
            json!({ "cellar_id": cellar_id, "calendar_id": calendar_id, "day": day.to_rfc3339() });

        let calendar = self
            .calendar_repository
            .find_by_id(cellar_id, calendar_id)
            .await?
            .ok_or_else(|| AppError::not_found("Advent calendar not found", not_found_details.clone()))?;

        let (day_id, stored_day) = calendar
            .day(day)
            .map(|d| (d.id, d.day))
            .ok_or_else(|| {
                AppError::not_found("Advent calendar day not found", not_found_details.clone())
            })?;

        let filter = self
            .calendar_repository
            .get_day_filter(cellar_id, calendar_id, day)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Advent calendar day filter not found", not_found_details.clone())
            })?;

        let excluded = calendar.assigned_entry_ids();
        let now = self.clock.now();
        let mut rng = self.rng_source.rng();

        let entry = self
            .unique_recommendation(cellar_id, stored_day, &filter, now, &excluded, &mut rng)
            .await?;

        let replaced = self
            .calendar_repository
            .replace_day_entry(cellar_id, calendar_id, day, entry.id)
            .await?;

        if !replaced {
            return Err(AppError::not_found(
                "Advent calendar day not found",
                not_found_details,
            ));
        }

        tracing::info!(
            cellar_id,
            calendar_id,
            day = %stored_day,
            entry_id = entry.id,
            "Advent calendar day regenerated"
        );

        Ok(AdventCalendarDay {
            id: day_id,
            day: stored_day,
            entry,
            revealed: false,
            filter,
        })
    }

    /// Marks a day as revealed. Revealing an already revealed day is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the day does not exist in the calendar.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn mark_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<(), AppError> {
        let day = truncate_to_day(day);

        if !self
            .calendar_repository
            .set_day_revealed(cellar_id, calendar_id, day)
            .await?
        {
            return Err(AppError::not_found(
                "Advent calendar day not found",
                json!({ "cellar_id": cellar_id, "calendar_id": calendar_id, "day": day.to_rfc3339() }),
            ));
        }

        Ok(())
    }

    /// Flips a day's reveal flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the day does not exist in the calendar.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn toggle_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<bool, AppError> {
        let day = truncate_to_day(day);

        self.calendar_repository
            .toggle_day_revealed(cellar_id, calendar_id, day)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Advent calendar day not found",
                    json!({ "cellar_id": cellar_id, "calendar_id": calendar_id, "day": day.to_rfc3339() }),
                )
            })
    }

    /// Retrieves a calendar by id, by name, or by a date it contains.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no calendar matches.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_calendar(
        &self,
        cellar_id: i64,
        lookup: CalendarLookup,
    ) -> Result<AdventCalendar, AppError> {
        let found = match &lookup {
            CalendarLookup::Id(id) => self.calendar_repository.find_by_id(cellar_id, *id).await?,
            CalendarLookup::Name(name) => {
                self.calendar_repository
                    .find_by_name(cellar_id, name)
                    .await?
            }
            CalendarLookup::ContainingDate(date) => {
                self.calendar_repository
                    .find_for_date(cellar_id, truncate_to_day(*date))
                    .await?
            }
        };

        found.ok_or_else(|| {
            AppError::not_found(
                "Advent calendar not found",
                json!({ "cellar_id": cellar_id, "lookup": format!("{lookup:?}") }),
            )
        })
    }

    /// Deletes a calendar and all of its days.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the calendar does not exist in the cellar.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn delete_calendar(&self, cellar_id: i64, calendar_id: i64) -> Result<(), AppError> {
        if !self.calendar_repository.delete(cellar_id, calendar_id).await? {
            return Err(AppError::not_found(
                "Advent calendar not found",
                json!({ "cellar_id": cellar_id, "calendar_id": calendar_id }),
            ));
        }

        tracing::info!(cellar_id, calendar_id, "Advent calendar deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::entities::cellar_entry::fixtures::entry;
    use crate::domain::entities::{CellarEntry, RecommendationParams};
    use crate::domain::filter_compiler::{Clause, CompiledPredicate};
    use crate::domain::repositories::{MockCalendarRepository, MockCellarRepository};
    use crate::domain::rng::SeededRngSource;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::time::Duration;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn service(
        cellar_repo: MockCellarRepository,
        calendar_repo: MockCalendarRepository,
    ) -> CalendarService<MockCellarRepository, MockCalendarRepository> {
        CalendarService::new(
            Arc::new(cellar_repo),
            Arc::new(calendar_repo),
            Arc::new(SeededRngSource::new(11)),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2023, 11, 20, 9, 0, 0).unwrap())),
        )
    }

    fn min_abv(v: f64) -> Filter {
        Filter {
            minimum_abv: Some(v),
            ..Default::default()
        }
    }

    fn entries(ids: &[i64]) -> Vec<CellarEntry> {
        ids.iter().map(|id| entry(*id)).collect()
    }

    fn request(start: &str, end: &str, filters: Vec<Filter>) -> CreateCalendar {
        CreateCalendar {
            cellar_id: 1,
            name: "Christmas 2023".to_string(),
            description: "24 beers".to_string(),
            start_date: at(start),
            end_date: at(end),
            filters,
        }
    }

    /// What a repository would hand back after saving.
    fn saved(new: NewAdventCalendar) -> AdventCalendar {
        AdventCalendar {
            id: 99,
            cellar_id: new.cellar_id,
            name: new.name,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            days: new
                .days
                .into_iter()
                .enumerate()
                .map(|(i, d)| AdventCalendarDay {
                    id: i as i64 + 1,
                    day: d.day,
                    entry: entry(d.cellar_entry_id),
                    revealed: false,
                    filter: d.filter,
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    fn calendar(days: &[(&str, i64)]) -> AdventCalendar {
        saved(NewAdventCalendar {
            cellar_id: 1,
            name: "Christmas 2023".to_string(),
            description: String::new(),
            start_date: at(days[0].0),
            end_date: at(days[days.len() - 1].0),
            days: days
                .iter()
                .map(|(d, id)| NewAdventCalendarDay {
                    day: at(d),
                    cellar_entry_id: *id,
                    filter: Filter::default(),
                })
                .collect(),
        })
    }

    // ─── create ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_rejects_filter_count_mismatch_before_fetching() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();
        cellar_repo.expect_fetch_candidates().times(0);
        calendar_repo.expect_save().times(0);

        let result = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-02T00:00:00Z",
                vec![Filter::default()],
            ))
            .await;

        match result.unwrap_err() {
            AppError::Validation { message, details } => {
                assert_eq!(message, "Filter count must match day count");
                assert_eq!(details["days"], 2);
                assert_eq!(details["filters"], 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_reversed_range() {
        let mut cellar_repo = MockCellarRepository::new();
        cellar_repo.expect_fetch_candidates().times(0);

        let result = service(cellar_repo, MockCalendarRepository::new())
            .create_calendar(request(
                "2023-12-02T00:00:00Z",
                "2023-12-01T00:00:00Z",
                vec![],
            ))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_excludes_entries_used_on_earlier_days() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .withf(|cellar, p| *cellar == 1 && p.clauses() == [Clause::AbvAtLeast(8.0)])
            .times(1)
            .returning(|_, _| Ok(entries(&[1])));
        cellar_repo
            .expect_fetch_candidates()
            .withf(|_, p| p.clauses() == [Clause::AbvAtLeast(9.0)])
            .times(1)
            .returning(|_, _| Ok(entries(&[1, 2])));

        calendar_repo
            .expect_save()
            .withf(|new| {
                new.days.iter().map(|d| d.cellar_entry_id).collect::<Vec<_>>() == vec![1, 2]
                    && new.days[0].day == at("2023-12-01T00:00:00Z")
                    && new.days[1].day == at("2023-12-02T00:00:00Z")
                    && new.days[1].filter == min_abv(9.0)
            })
            .times(1)
            .returning(|new| Ok(saved(new)));

        let calendar = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-02T00:00:00Z",
                vec![min_abv(8.0), min_abv(9.0)],
            ))
            .await
            .unwrap();

        assert_eq!(calendar.id, 99);
        assert_eq!(calendar.days.len(), 2);
        assert_eq!(calendar.days[0].entry.id, 1);
        assert_eq!(calendar.days[1].entry.id, 2);
        assert!(calendar.days.iter().all(|d| !d.revealed));
    }

    #[tokio::test]
    async fn test_create_full_advent_has_unique_entries() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        let pool: Vec<i64> = (1..=30).collect();
        cellar_repo
            .expect_fetch_candidates()
            .times(24)
            .returning(move |_, _| Ok(entries(&pool)));

        calendar_repo
            .expect_save()
            .withf(|new| {
                let ids: HashSet<i64> = new.days.iter().map(|d| d.cellar_entry_id).collect();
                new.days.len() == 24 && ids.len() == 24
            })
            .times(1)
            .returning(|new| Ok(saved(new)));

        let calendar = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-24T00:00:00Z",
                vec![Filter::default(); 24],
            ))
            .await
            .unwrap();

        assert_eq!(calendar.days.len(), 24);
    }

    #[tokio::test]
    async fn test_create_exhausting_pool_exactly_succeeds() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .times(3)
            .returning(|_, _| Ok(entries(&[5, 6, 7])));
        calendar_repo
            .expect_save()
            .times(1)
            .returning(|new| Ok(saved(new)));

        let calendar = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-03T00:00:00Z",
                vec![Filter::default(); 3],
            ))
            .await
            .unwrap();

        let ids: HashSet<i64> = calendar.days.iter().map(|d| d.entry.id).collect();
        assert_eq!(ids, HashSet::from([5, 6, 7]));
    }

    #[tokio::test]
    async fn test_create_aborts_on_day_without_candidates() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .withf(|_, p| p.clauses() == [Clause::AbvAtLeast(8.0)])
            .times(1)
            .returning(|_, _| Ok(entries(&[1])));
        cellar_repo
            .expect_fetch_candidates()
            .withf(|_, p| p.clauses() == [Clause::AbvAtLeast(20.0)])
            .times(1)
            .returning(|_, _| Ok(vec![]));
        calendar_repo.expect_save().times(0);

        let result = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-03T00:00:00Z",
                vec![min_abv(8.0), min_abv(20.0), min_abv(5.0)],
            ))
            .await;

        match result.unwrap_err() {
            AppError::NoCandidates { details, .. } => {
                assert_eq!(details["day"], "2023-12-02T00:00:00+00:00");
                assert_eq!(details["filter"]["minimum_abv"], 20.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_aborts_when_only_used_entries_match() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .times(2)
            .returning(|_, _| Ok(entries(&[1])));
        calendar_repo.expect_save().times(0);

        let result = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-02T00:00:00Z",
                vec![min_abv(8.0), min_abv(8.0)],
            ))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::NoUniqueCandidate { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_truncates_dates_in_caller_offset() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .times(2)
            .returning(|_, _| Ok(entries(&[1, 2])));
        calendar_repo
            .expect_save()
            .withf(|new| {
                new.start_date.to_rfc3339() == "2023-12-01T00:00:00+05:00"
                    && new.end_date.to_rfc3339() == "2023-12-02T00:00:00+05:00"
                    && new.days[1].day.to_rfc3339() == "2023-12-02T00:00:00+05:00"
            })
            .times(1)
            .returning(|new| Ok(saved(new)));

        let calendar = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T18:00:00+05:00",
                "2023-12-02T09:15:00+05:00",
                vec![Filter::default(); 2],
            ))
            .await
            .unwrap();

        assert_eq!(calendar.start_date.offset().local_minus_utc(), 5 * 3600);
    }

    #[tokio::test]
    async fn test_create_counts_local_dates_when_offsets_differ() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .times(2)
            .returning(|_, _| Ok(entries(&[1, 2])));
        calendar_repo
            .expect_save()
            .withf(|new| {
                new.days.len() == 2
                    && new.start_date.to_rfc3339() == "2023-12-01T00:00:00+14:00"
                    && new.end_date.to_rfc3339() == "2023-12-02T00:00:00+14:00"
                    && new.days[1].day.to_rfc3339() == "2023-12-02T00:00:00+14:00"
            })
            .times(1)
            .returning(|new| Ok(saved(new)));

        let calendar = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T09:00:00+14:00",
                "2023-12-02T09:00:00-12:00",
                vec![Filter::default(); 2],
            ))
            .await
            .unwrap();

        assert_eq!(calendar.days.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_huge_range_before_fetching() {
        let mut cellar_repo = MockCellarRepository::new();
        cellar_repo.expect_fetch_candidates().times(0);

        let result = service(cellar_repo, MockCalendarRepository::new())
            .create_calendar(request(
                "0001-01-01T00:00:00Z",
                "9999-12-31T00:00:00Z",
                vec![Filter::default(); 24],
            ))
            .await;

        match result.unwrap_err() {
            AppError::Validation { details, .. } => assert_eq!(details["days"], 3_652_059),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_passes_storage_errors_through() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        cellar_repo
            .expect_fetch_candidates()
            .returning(|_, _| Ok(entries(&[1])));
        calendar_repo
            .expect_save()
            .returning(|_| Err(AppError::Storage(sqlx::Error::PoolTimedOut)));

        let result = service(cellar_repo, calendar_repo)
            .create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-01T00:00:00Z",
                vec![Filter::default()],
            ))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::Storage(sqlx::Error::PoolTimedOut)
        ));
    }

    /// Candidate source that never answers.
    struct StalledCellar;

    #[async_trait]
    impl CellarRepository for StalledCellar {
        async fn fetch_candidates(
            &self,
            _cellar_id: i64,
            _predicate: &CompiledPredicate,
        ) -> Result<Vec<CellarEntry>, AppError> {
            std::future::pending().await
        }

        async fn recommendation_params(
            &self,
            _cellar_id: i64,
        ) -> Result<RecommendationParams, AppError> {
            Ok(RecommendationParams::default())
        }
    }

    #[tokio::test]
    async fn test_cancelled_build_writes_nothing() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo.expect_save().times(0);

        let service = CalendarService::new(
            Arc::new(StalledCellar),
            Arc::new(calendar_repo),
            Arc::new(SeededRngSource::new(1)),
            Arc::new(FixedClock(Utc::now())),
        );

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            service.create_calendar(request(
                "2023-12-01T00:00:00Z",
                "2023-12-02T00:00:00Z",
                vec![Filter::default(); 2],
            )),
        )
        .await;

        assert!(result.is_err());
    }

    // ─── regenerate ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_regenerate_never_keeps_or_steals_entries() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        let existing = calendar(&[("2023-12-01T00:00:00Z", 1), ("2023-12-02T00:00:00Z", 2)]);
        calendar_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        calendar_repo
            .expect_get_day_filter()
            .times(1)
            .returning(|_, _, _| Ok(Some(min_abv(8.0))));
        cellar_repo
            .expect_fetch_candidates()
            .times(1)
            .returning(|_, _| Ok(entries(&[1, 2])));
        calendar_repo.expect_replace_day_entry().times(0);

        let result = service(cellar_repo, calendar_repo)
            .regenerate_day(1, 99, at("2023-12-01T15:00:00Z"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::NoUniqueCandidate { .. }
        ));
    }

    #[tokio::test]
    async fn test_regenerate_replaces_only_target_day() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        let existing = calendar(&[("2023-12-01T00:00:00Z", 1), ("2023-12-02T00:00:00Z", 2)]);
        calendar_repo
            .expect_find_by_id()
            .withf(|cellar, id| *cellar == 1 && *id == 99)
            .returning(move |_, _| Ok(Some(existing.clone())));
        calendar_repo
            .expect_get_day_filter()
            .withf(|_, _, day| *day == at("2023-12-02T00:00:00Z"))
            .returning(|_, _, _| Ok(Some(min_abv(9.0))));
        cellar_repo
            .expect_fetch_candidates()
            .withf(|_, p| p.clauses() == [Clause::AbvAtLeast(9.0)])
            .returning(|_, _| Ok(entries(&[1, 2, 3])));
        calendar_repo
            .expect_replace_day_entry()
            .withf(|cellar, id, day, entry_id| {
                *cellar == 1 && *id == 99 && *day == at("2023-12-02T00:00:00Z") && *entry_id == 3
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let day = service(cellar_repo, calendar_repo)
            .regenerate_day(1, 99, at("2023-12-02T20:00:00Z"))
            .await
            .unwrap();

        assert_eq!(day.entry.id, 3);
        assert_eq!(day.id, 2);
        assert!(!day.revealed);
        assert_eq!(day.filter, min_abv(9.0));
    }

    #[tokio::test]
    async fn test_regenerate_missing_calendar() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_find_by_id()
            .returning(|_, _| Ok(None));
        calendar_repo.expect_get_day_filter().times(0);

        let result = service(MockCellarRepository::new(), calendar_repo)
            .regenerate_day(1, 5, at("2023-12-01T00:00:00Z"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_regenerate_day_outside_calendar() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        let existing = calendar(&[("2023-12-01T00:00:00Z", 1)]);
        calendar_repo
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(existing.clone())));
        calendar_repo.expect_get_day_filter().times(0);
        cellar_repo.expect_fetch_candidates().times(0);

        let result = service(cellar_repo, calendar_repo)
            .regenerate_day(1, 99, at("2023-12-05T00:00:00Z"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_regenerate_missing_filter() {
        let mut cellar_repo = MockCellarRepository::new();
        let mut calendar_repo = MockCalendarRepository::new();

        let existing = calendar(&[("2023-12-01T00:00:00Z", 1)]);
        calendar_repo
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(existing.clone())));
        calendar_repo
            .expect_get_day_filter()
            .returning(|_, _, _| Ok(None));
        cellar_repo.expect_fetch_candidates().times(0);

        let result = service(cellar_repo, calendar_repo)
            .regenerate_day(1, 99, at("2023-12-01T00:00:00Z"))
            .await;

        match result.unwrap_err() {
            AppError::NotFound { message, .. } => {
                assert_eq!(message, "Advent calendar day filter not found")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ─── reveal ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mark_revealed_sets_flag_for_truncated_day() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_set_day_revealed()
            .withf(|cellar, id, day| {
                *cellar == 1 && *id == 99 && day.to_rfc3339() == "2023-12-03T00:00:00+01:00"
            })
            .times(1)
            .returning(|_, _, _| Ok(true));
        calendar_repo.expect_toggle_day_revealed().times(0);

        service(MockCellarRepository::new(), calendar_repo)
            .mark_day_revealed(1, 99, at("2023-12-03T07:30:00+01:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_mark_revealed_unknown_day() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_set_day_revealed()
            .returning(|_, _, _| Ok(false));

        let result = service(MockCellarRepository::new(), calendar_repo)
            .mark_day_revealed(1, 99, at("2023-12-03T00:00:00Z"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_toggle_revealed_returns_new_state() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_toggle_day_revealed()
            .times(1)
            .returning(|_, _, _| Ok(Some(false)));
        calendar_repo.expect_set_day_revealed().times(0);

        let revealed = service(MockCellarRepository::new(), calendar_repo)
            .toggle_day_revealed(1, 99, at("2023-12-03T00:00:00Z"))
            .await
            .unwrap();

        assert!(!revealed);
    }

    #[tokio::test]
    async fn test_toggle_revealed_unknown_day() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_toggle_day_revealed()
            .returning(|_, _, _| Ok(None));

        let result = service(MockCellarRepository::new(), calendar_repo)
            .toggle_day_revealed(1, 99, at("2023-12-03T00:00:00Z"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    // ─── get / delete ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_by_name() {
        let mut calendar_repo = MockCalendarRepository::new();
        let existing = calendar(&[("2023-12-01T00:00:00Z", 1)]);
        calendar_repo
            .expect_find_by_name()
            .withf(|cellar, name| *cellar == 1 && name == "Christmas 2023")
            .returning(move |_, _| Ok(Some(existing.clone())));

        let found = service(MockCellarRepository::new(), calendar_repo)
            .get_calendar(1, CalendarLookup::Name("Christmas 2023".to_string()))
            .await
            .unwrap();

        assert_eq!(found.name, "Christmas 2023");
    }

    #[tokio::test]
    async fn test_get_for_date_truncates() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_find_for_date()
            .withf(|_, date| date.to_rfc3339() == "2023-12-10T00:00:00-05:00")
            .times(1)
            .returning(|_, _| Ok(None));

        let result = service(MockCellarRepository::new(), calendar_repo)
            .get_calendar(
                1,
                CalendarLookup::ContainingDate(at("2023-12-10T22:00:00-05:00")),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_unknown_calendar() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo.expect_delete().returning(|_, _| Ok(false));

        let result = service(MockCellarRepository::new(), calendar_repo)
            .delete_calendar(1, 42)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_calendar() {
        let mut calendar_repo = MockCalendarRepository::new();
        calendar_repo
            .expect_delete()
            .withf(|cellar, id| *cellar == 1 && *id == 42)
            .times(1)
            .returning(|_, _| Ok(true));

        service(MockCellarRepository::new(), calendar_repo)
            .delete_calendar(1, 42)
            .await
            .unwrap();
    }
}
