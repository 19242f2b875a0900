//! DTO for recommendation filters in request bodies.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::Filter;

/// A filter as sent by clients.
///
/// Every field is optional. Ranges must not be inverted.
///
/// ```json
/// { "minimum_abv": 8.0, "style_id": 3, "tags": ["christmas"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_filter_ranges"))]
pub struct FilterRequest {
    #[serde(flatten)]
    pub filter: Filter,
}

impl From<FilterRequest> for Filter {
    fn from(request: FilterRequest) -> Self {
        request.filter
    }
}

fn inverted<T: PartialOrd>(min: Option<T>, max: Option<T>) -> bool {
    matches!((min, max), (Some(min), Some(max)) if min > max)
}

fn validate_filter_ranges(request: &FilterRequest) -> Result<(), ValidationError> {
    let f = &request.filter;

    if inverted(f.minimum_abv, f.maximum_abv)
        || inverted(f.minimum_rating, f.maximum_rating)
        || inverted(f.minimum_size, f.maximum_size)
        || inverted(f.minimum_vintage, f.maximum_vintage)
    {
        return Err(ValidationError::new("inverted_range")
            .with_message("Minimum must not exceed maximum".into()));
    }

    if f.minimum_quantity.is_some_and(|q| q < 0) {
        return Err(ValidationError::new("negative_quantity")
            .with_message("Minimum quantity must not be negative".into()));
    }

    Ok(())
}
