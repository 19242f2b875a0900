//! DTOs describing cellar entries in responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::CellarEntry;

/// A cellar entry with its beer details.
#[derive(Debug, Serialize)]
pub struct CellarEntryResponse {
    pub id: i64,
    pub cellar_id: i64,
    pub beer: BeerResponse,
    pub vintage: Option<i32>,
    pub quantity: i64,
    pub location: Option<RefResponse>,
    pub format: Option<FormatResponse>,
    pub had_before: bool,
    pub special: bool,
    pub date_added: Option<DateTime<Utc>>,
    pub drink_before: Option<DateTime<Utc>>,
    pub cellar_until: Option<DateTime<Utc>>,
    pub tags: Vec<String>,

    /// Set when the entry has since left the cellar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct BeerResponse {
    pub id: i64,
    pub name: String,
    pub brewery: RefResponse,
    pub style: Option<RefResponse>,
    pub abv: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub id: i64,
    pub package: String,
    pub size: f64,
}

/// Identifier plus display name.
#[derive(Debug, Serialize)]
pub struct RefResponse {
    pub id: i64,
    pub name: String,
}

impl From<CellarEntry> for CellarEntryResponse {
    fn from(entry: CellarEntry) -> Self {
        let beer = entry.beer;
        let style = match (beer.style_id, beer.style_name) {
            (Some(id), Some(name)) => Some(RefResponse { id, name }),
            _ => None,
        };

        Self {
            id: entry.id,
            cellar_id: entry.cellar_id,
            beer: BeerResponse {
                id: beer.id,
                name: beer.name,
                brewery: RefResponse {
                    id: beer.brewery_id,
                    name: beer.brewery_name,
                },
                style,
                abv: beer.abv,
                rating: beer.rating,
            },
            vintage: entry.vintage,
            quantity: entry.quantity,
            location: entry.location.map(|l| RefResponse {
                id: l.id,
                name: l.name,
            }),
            format: entry.format.map(|f| FormatResponse {
                id: f.id,
                package: f.package,
                size: f.size_metric,
            }),
            had_before: entry.had_before,
            special: entry.special,
            date_added: entry.date_added,
            drink_before: entry.drink_before,
            cellar_until: entry.cellar_until,
            tags: entry.tags.into_iter().collect(),
            removed_at: entry.removed_at,
        }
    }
}
