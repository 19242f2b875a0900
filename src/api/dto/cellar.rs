//! DTOs for cellar inventory endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::domain::entities::{CellarStats, EntryChanges};

/// Partial update of a cellar entry. Omitted fields are left unchanged.
///
/// A `quantity` of 0 removes the entry from the cellar.
///
/// ```json
/// { "quantity": 2, "had_before": true, "tags": ["christmas"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEntryRequest {
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i64>,

    pub vintage: Option<i32>,
    pub location_id: Option<i64>,
    pub format_id: Option<i64>,
    pub had_before: Option<bool>,
    pub special: Option<bool>,
    pub date_added: Option<DateTime<Utc>>,
    pub drink_before: Option<DateTime<Utc>>,
    pub cellar_until: Option<DateTime<Utc>>,

    /// Replaces the entry's tags when present.
    pub tags: Option<BTreeSet<String>>,
}

impl From<UpdateEntryRequest> for EntryChanges {
    fn from(r: UpdateEntryRequest) -> Self {
        Self {
            quantity: r.quantity,
            vintage: r.vintage,
            location_id: r.location_id,
            format_id: r.format_id,
            had_before: r.had_before,
            special: r.special,
            date_added: r.date_added,
            drink_before: r.drink_before,
            cellar_until: r.cellar_until,
            tags: r.tags,
        }
    }
}

/// Inventory totals for a cellar.
#[derive(Debug, Serialize)]
pub struct CellarStatsResponse {
    pub cellar_id: i64,
    pub beer_count: i64,
    pub unique_count: i64,
    pub total_volume: f64,
    pub brewery_count: i64,
    pub untried_count: i64,
    pub special_count: i64,
    pub average_abv: Option<f64>,
    pub average_rating: Option<f64>,
}

impl From<CellarStats> for CellarStatsResponse {
    fn from(s: CellarStats) -> Self {
        Self {
            cellar_id: s.cellar_id,
            beer_count: s.beer_count,
            unique_count: s.unique_count,
            total_volume: s.total_volume,
            brewery_count: s.brewery_count,
            untried_count: s.untried_count,
            special_count: s.special_count,
            average_abv: s.average_abv,
            average_rating: s.average_rating,
        }
    }
}
