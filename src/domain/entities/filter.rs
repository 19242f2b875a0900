//! Recommendation filter over cellar entry attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sparse set of selection criteria.
///
/// Every field is optional and an unset field means "no constraint". It never
/// means "the attribute must be absent". Ranges are inclusive on both ends;
/// `added_before` is exclusive. An empty `tags` set is unset; a non-empty one
/// requires an entry to carry every listed tag.
///
/// Filters are stored verbatim with each advent calendar day so regeneration
/// reproduces the day's original criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brewery_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_abv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_abv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_before: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdue_to_drink: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_vintage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_vintage: Option<i32>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_before: Option<DateTime<Utc>>,
}

impl Filter {
    /// Returns true if no criterion is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}
