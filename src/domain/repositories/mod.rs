//! Repository trait definitions for the domain layer.
//!
//! These traits are the collaborator contracts the recommendation engine
//! depends on. Concrete implementations live in
//! `crate::infrastructure::persistence`; mocks are generated with `mockall`.
//!
//! # Available Repositories
//!
//! - [`CellarRepository`] - Candidate fetching and cellar-wide filter bounds
//! - [`CalendarRepository`] - Advent calendar persistence
//! - [`InventoryRepository`] - Entry updates, removal and cellar totals
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod calendar_repository;
pub mod cellar_repository;
pub mod inventory_repository;

pub use calendar_repository::CalendarRepository;
pub use cellar_repository::{CellarRepository, EntryVisibility};
pub use inventory_repository::InventoryRepository;

#[cfg(test)]
pub use calendar_repository::MockCalendarRepository;
#[cfg(test)]
pub use cellar_repository::MockCellarRepository;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
