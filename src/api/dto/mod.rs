//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod calendar;
pub mod cellar;
pub mod entry;
pub mod filter;
pub mod health;
pub mod recommendation;
