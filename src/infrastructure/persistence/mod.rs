//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Filter
//! predicates are assembled with [`sqlx::QueryBuilder`] so every value is a
//! bound parameter.
//!
//! # Repositories
//!
//! - [`PgCellarRepository`] - Candidate queries and filter bounds
//! - [`PgCalendarRepository`] - Advent calendar storage and day updates

mod entry_rows;
pub mod pg_calendar_repository;
pub mod pg_cellar_repository;

pub use pg_calendar_repository::PgCalendarRepository;
pub use pg_cellar_repository::PgCellarRepository;
