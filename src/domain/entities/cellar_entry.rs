//! Cellar entry entity representing one stored beer in a cellar.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Beer attributes joined onto a cellar entry.
///
/// Carries the fields recommendation filters match against (brewery, style,
/// ABV, rating) together with display names.
#[derive(Debug, Clone, PartialEq)]
pub struct BeerDetails {
    pub id: i64,
    pub name: String,
    pub brewery_id: i64,
    pub brewery_name: String,
    pub style_id: Option<i64>,
    pub style_name: Option<String>,
    pub abv: Option<f64>,
    pub rating: Option<f64>,
}

/// Packaging an entry is stored in (bottle, can, keg) and its size in millilitres.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerFormat {
    pub id: i64,
    pub package: String,
    pub size_metric: f64,
}

/// Named place inside a cellar where an entry is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageLocation {
    pub id: i64,
    pub name: String,
}

/// One inventory record inside a cellar.
///
/// An entry whose quantity reaches zero is removed from the live cellar. Removal
/// is soft: `removed_at` is set and the row stays readable so advent calendar
/// days that point at it keep resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct CellarEntry {
    pub id: i64,
    pub cellar_id: i64,
    pub beer: BeerDetails,
    pub vintage: Option<i32>,
    pub quantity: i64,
    pub location: Option<StorageLocation>,
    pub format: Option<ContainerFormat>,
    pub had_before: bool,
    pub special: bool,
    pub date_added: Option<DateTime<Utc>>,
    pub drink_before: Option<DateTime<Utc>>,
    pub cellar_until: Option<DateTime<Utc>>,
    pub tags: BTreeSet<String>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl CellarEntry {
    /// Returns true if the entry has been removed from the live cellar.
    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }

    /// Returns true if the entry should have been drunk before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.drink_before.is_some_and(|d| d < now)
    }

    /// Returns true if the entry carries every tag in `tags`.
    pub fn has_all_tags(&self, tags: &BTreeSet<String>) -> bool {
        self.tags.is_superset(tags)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal live entry used across unit tests.
    pub fn entry(id: i64) -> CellarEntry {
        CellarEntry {
            id,
            cellar_id: 1,
            beer: BeerDetails {
                id: id * 10,
                name: format!("Beer {id}"),
                brewery_id: 7,
                brewery_name: "Brasserie Test".to_string(),
                style_id: Some(3),
                style_name: Some("Imperial Stout".to_string()),
                abv: Some(10.5),
                rating: Some(4.2),
            },
            vintage: Some(2020),
            quantity: 2,
            location: None,
            format: Some(ContainerFormat {
                id: 1,
                package: "bottle".to_string(),
                size_metric: 375.0,
            }),
            had_before: false,
            special: false,
            date_added: None,
            drink_before: None,
            cellar_until: None,
            tags: BTreeSet::new(),
            removed_at: None,
        }
    }
}
