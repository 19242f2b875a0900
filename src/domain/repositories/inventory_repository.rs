//! Repository trait for maintaining cellar inventory.

use crate::domain::entities::{CellarEntry, CellarStats, EntryChanges};
use crate::error::AppError;
use async_trait::async_trait;

/// Inventory maintenance and totals for a cellar.
///
/// Only live entries are counted or changed. Removal is soft, so calendar days
/// that reference a removed entry keep resolving it.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCellarRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_inventory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Computes totals over the cellar's live entries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn cellar_stats(&self, cellar_id: i64) -> Result<CellarStats, AppError>;

    /// Applies `changes` to a live entry and returns it as stored.
    ///
    /// Returns `Ok(None)` if the cellar holds no live entry with this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors, including a quantity
    /// of zero on an entry that is still live.
    async fn update_entry(
        &self,
        cellar_id: i64,
        entry_id: i64,
        changes: &EntryChanges,
    ) -> Result<Option<CellarEntry>, AppError>;

    /// Marks a live entry as removed from the cellar.
    ///
    /// Returns `Ok(false)` if there was no live entry with this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn remove_entry(&self, cellar_id: i64, entry_id: i64) -> Result<bool, AppError>;
}
