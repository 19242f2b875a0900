//! Advent calendar entities: a date range of daily recommendations.

use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashSet;

use super::{CellarEntry, Filter};

/// A persisted advent calendar with all of its days.
///
/// Start, end and day dates are local midnights in the offset the calendar was
/// created with. Days are ordered by date and no two days reference the same
/// cellar entry.
#[derive(Debug, Clone)]
pub struct AdventCalendar {
    pub id: i64,
    pub cellar_id: i64,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub days: Vec<AdventCalendarDay>,
    pub created_at: DateTime<Utc>,
}

impl AdventCalendar {
    /// Finds the day falling on `day` (compared as instants).
    pub fn day(&self, day: DateTime<FixedOffset>) -> Option<&AdventCalendarDay> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Ids of every cellar entry currently assigned to a day.
    pub fn assigned_entry_ids(&self) -> HashSet<i64> {
        self.days.iter().map(|d| d.entry.id).collect()
    }
}

/// One date within a calendar.
#[derive(Debug, Clone)]
pub struct AdventCalendarDay {
    pub id: i64,
    pub day: DateTime<FixedOffset>,
    pub entry: CellarEntry,
    pub revealed: bool,
    pub filter: Filter,
}

/// A fully assembled calendar ready to be persisted as one unit.
#[derive(Debug, Clone)]
pub struct NewAdventCalendar {
    pub cellar_id: i64,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub days: Vec<NewAdventCalendarDay>,
}

/// Day assignment produced while building a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdventCalendarDay {
    pub day: DateTime<FixedOffset>,
    pub cellar_entry_id: i64,
    pub filter: Filter,
}

/// Criteria for looking up a single calendar in a cellar.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarLookup {
    Id(i64),
    Name(String),
    /// The calendar whose date range contains this (truncated) date.
    ContainingDate(DateTime<FixedOffset>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::cellar_entry::fixtures::entry;

    fn day(date: &str, entry_id: i64) -> AdventCalendarDay {
        AdventCalendarDay {
            id: entry_id,
            day: DateTime::parse_from_rfc3339(date).unwrap(),
            entry: entry(entry_id),
            revealed: false,
            filter: Filter::default(),
        }
    }

    #[test]
    fn test_day_lookup_compares_instants() {
        let calendar = AdventCalendar {
            id: 1,
            cellar_id: 1,
            name: "Xmas".to_string(),
            description: String::new(),
            start_date: DateTime::parse_from_rfc3339("2023-12-01T00:00:00+01:00").unwrap(),
            end_date: DateTime::parse_from_rfc3339("2023-12-02T00:00:00+01:00").unwrap(),
            days: vec![
                day("2023-12-01T00:00:00+01:00", 11),
                day("2023-12-02T00:00:00+01:00", 12),
            ],
            created_at: Utc::now(),
        };

        let same_instant_in_utc = DateTime::parse_from_rfc3339("2023-12-01T23:00:00Z").unwrap();
        assert_eq!(calendar.day(same_instant_in_utc).unwrap().entry.id, 12);

        let missing = DateTime::parse_from_rfc3339("2023-12-03T00:00:00+01:00").unwrap();
        assert!(calendar.day(missing).is_none());

        assert_eq!(calendar.assigned_entry_ids(), HashSet::from([11, 12]));
    }
}
