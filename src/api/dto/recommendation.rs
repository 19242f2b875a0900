//! DTOs for recommendation endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::RefResponse;
use crate::domain::entities::{NamedRef, RecommendationParams};

/// Filter bounds for a cellar.
///
/// ```json
/// {
///   "breweries": [{ "id": 1, "name": "De Struise" }],
///   "styles": [{ "id": 3, "name": "Imperial Stout" }],
///   "minimum_abv": 4.5,
///   "maximum_abv": 13.0,
///   ...
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct RecommendationParamsResponse {
    pub breweries: Vec<RefResponse>,
    pub styles: Vec<RefResponse>,
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

impl From<NamedRef> for RefResponse {
    fn from(r: NamedRef) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

impl From<RecommendationParams> for RecommendationParamsResponse {
    fn from(p: RecommendationParams) -> Self {
        Self {
            breweries: p.breweries.into_iter().map(RefResponse::from).collect(),
            styles: p.styles.into_iter().map(RefResponse::from).collect(),
            minimum_abv: p.minimum_abv,
            maximum_abv: p.maximum_abv,
            minimum_size: p.minimum_size,
            maximum_size: p.maximum_size,
            minimum_vintage: p.minimum_vintage,
            maximum_vintage: p.maximum_vintage,
            minimum_rating: p.minimum_rating,
            maximum_rating: p.maximum_rating,
            oldest_added_date: p.oldest_added_date,
        }
    }
}
