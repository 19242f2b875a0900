//! Day-granularity date handling for advent calendars.
//!
//! Dates keep the UTC offset the caller supplied. Truncation moves an instant
//! to local midnight in that same offset; it never normalizes to UTC.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone};

fn midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    offset.from_utc_datetime(&utc_midnight)
}

/// Truncates an instant to midnight of its local day, keeping its offset.
///
/// `2023-12-15T10:30:00Z` becomes `2023-12-15T00:00:00Z`, and
/// `2023-12-15T23:30:00-08:00` becomes `2023-12-15T00:00:00-08:00`.
pub fn truncate_to_day(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    midnight(instant.date_naive(), *instant.offset())
}

/// Midnight in `offset` of the local date `instant` carries.
///
/// The calendar date is kept, not the instant: `2023-12-02T09:00:00-12:00`
/// anchored to `+14:00` becomes `2023-12-02T00:00:00+14:00`.
pub fn anchor_to_offset(
    instant: DateTime<FixedOffset>,
    offset: FixedOffset,
) -> DateTime<FixedOffset> {
    midnight(instant.date_naive(), offset)
}

/// Number of local dates in the inclusive range `start..=end`.
///
/// Counted from the dates alone, so nothing is allocated. Zero when `end` is
/// before `start`.
pub fn inclusive_day_count(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> usize {
    let span = end
        .date_naive()
        .signed_duration_since(start.date_naive())
        .num_days();
    usize::try_from(span + 1).unwrap_or(0)
}

/// Every day from `start` to `end` inclusive, advancing one calendar day at a time.
///
/// Days carry `start`'s offset. Returns an empty list when `end` is before
/// `start`. Inputs are expected to be truncated already.
pub fn days_inclusive(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Vec<DateTime<FixedOffset>> {
    (0..inclusive_day_count(start, end) as u64)
        .map_while(|i| start.checked_add_days(Days::new(i)))
        .collect()
}
