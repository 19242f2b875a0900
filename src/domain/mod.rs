//! Domain layer containing the cellar model and the recommendation engine.
//!
//! Nothing in this layer touches the database or HTTP. Randomness and the
//! current time come in through [`rng::RngSource`] and [`clock::Clock`].
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`filter_compiler`] - Filter to clause-list compilation
//! - [`selector`] - Uniform random selection under an exclusion set
//! - [`dates`] - Day truncation and inclusive date ranges
//!
//! # Recommendation Flow
//!
//! 1. A [`entities::Filter`] is compiled into a [`filter_compiler::CompiledPredicate`]
//! 2. [`repositories::CellarRepository::fetch_candidates`] returns matching entries
//! 3. [`selector::select`] picks one that is not already used
//! 4. Calendar services repeat this per day and persist through
//!    [`repositories::CalendarRepository`]

pub mod clock;
pub mod dates;
pub mod entities;
pub mod filter_compiler;
pub mod repositories;
pub mod rng;
pub mod selector;
