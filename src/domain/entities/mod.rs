//! Core domain entities representing the cellar data model.
//!
//! Entities are plain data structures. The only behaviour they carry is
//! lookups over their own fields.
//!
//! # Entity Types
//!
//! - [`CellarEntry`] - One stored beer with its joined beer, format and location data
//! - [`Filter`] - Sparse recommendation criteria
//! - [`AdventCalendar`] / [`AdventCalendarDay`] - A persisted calendar and its days
//! - [`RecommendationParams`] - Filter bounds derived from a cellar
//! - [`CellarStats`] - Inventory totals for a cellar
//! - [`EntryChanges`] - Partial update of a cellar entry
//!
//! # Design Pattern
//!
//! As elsewhere, creation inputs are separate structs: [`NewAdventCalendar`]
//! and [`NewAdventCalendarDay`] carry no database identities.

pub mod advent_calendar;
pub mod cellar_entry;
pub mod cellar_stats;
pub mod entry_changes;
pub mod filter;
pub mod recommendation_params;

pub use advent_calendar::{
    AdventCalendar, AdventCalendarDay, CalendarLookup, NewAdventCalendar, NewAdventCalendarDay,
};
pub use cellar_entry::{BeerDetails, CellarEntry, ContainerFormat, StorageLocation};
pub use cellar_stats::CellarStats;
pub use entry_changes::EntryChanges;
pub use filter::Filter;
pub use recommendation_params::{NamedRef, RecommendationParams};
