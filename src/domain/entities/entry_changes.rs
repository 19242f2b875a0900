//! Partial update of a cellar entry.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Fields to change on a cellar entry. `None` leaves a field as it is.
///
/// `tags`, when set, replaces the entry's whole tag set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryChanges {
    pub quantity: Option<i64>,
    pub vintage: Option<i32>,
    pub location_id: Option<i64>,
    pub format_id: Option<i64>,
    pub had_before: Option<bool>,
    pub special: Option<bool>,
    pub date_added: Option<DateTime<Utc>>,
    pub drink_before: Option<DateTime<Utc>>,
    pub cellar_until: Option<DateTime<Utc>>,
    pub tags: Option<BTreeSet<String>>,
}

impl EntryChanges {
    /// Returns true if the change drinks the last bottle, which removes the entry.
    pub fn empties_entry(&self) -> bool {
        self.quantity == Some(0)
    }
}
