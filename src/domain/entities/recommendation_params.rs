//! Bounds a client can offer when building recommendation filters.

use chrono::{DateTime, Utc};

/// Identifier and display name of a brewery or style present in a cellar.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// Distinct breweries and styles plus value ranges over a cellar's live entries.
///
/// Range bounds are `None` when the cellar is empty or no entry carries the
/// attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationParams {
    pub breweries: Vec<NamedRef>,
    pub styles: Vec<NamedRef>,
    pub minimum_abv: Option<f64>,
    pub maximum_abv: Option<f64>,
    pub minimum_size: Option<f64>,
    pub maximum_size: Option<f64>,
    pub minimum_vintage: Option<i32>,
    pub maximum_vintage: Option<i32>,
    pub minimum_rating: Option<f64>,
    pub maximum_rating: Option<f64>,
    pub oldest_added_date: Option<DateTime<Utc>>,
}
