//! Inventory totals for a cellar.

/// Totals over a cellar's live entries.
///
/// Counts are zero and averages `None` for an empty cellar. Entries without a
/// container format add nothing to `total_volume`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellarStats {
    pub cellar_id: i64,
    /// Bottles and cans across all entries.
    pub beer_count: i64,
    /// Distinct beers.
    pub unique_count: i64,
    /// Millilitres.
    pub total_volume: f64,
    pub brewery_count: i64,
    /// Entries not had before.
    pub untried_count: i64,
    pub special_count: i64,
    pub average_abv: Option<f64>,
    pub average_rating: Option<f64>,
}
