//! Cellar inventory maintenance and totals.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{CellarEntry, CellarStats, EntryChanges};
use crate::domain::repositories::InventoryRepository;
use crate::error::AppError;

/// Service for changing cellar entries and reporting cellar totals.
pub struct CellarService<I: InventoryRepository> {
    inventory_repository: Arc<I>,
}

impl<I: InventoryRepository> CellarService<I> {
    /// Creates a new cellar service.
    pub fn new(inventory_repository: Arc<I>) -> Self {
        Self {
            inventory_repository,
        }
    }

    /// Returns bottle, beer and brewery counts plus averages for a cellar.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn cellar_stats(&self, cellar_id: i64) -> Result<CellarStats, AppError> {
        self.inventory_repository.cellar_stats(cellar_id).await
    }

    /// Applies `changes` to a live entry.
    ///
    /// A quantity of zero removes the entry from the cellar instead, ignoring
    /// any other change, and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the quantity is negative
    /// - [`AppError::NotFound`] if the cellar holds no live entry with this id
    /// - [`AppError::Storage`] on database errors
    pub async fn update_entry(
        &self,
        cellar_id: i64,
        entry_id: i64,
        changes: EntryChanges,
    ) -> Result<Option<CellarEntry>, AppError> {
        if let Some(quantity) = changes.quantity.filter(|q| *q < 0) {
            return Err(AppError::bad_request(
                "Quantity must not be negative",
                json!({ "quantity": quantity }),
            ));
        }

        if changes.empties_entry() {
            self.remove_entry(cellar_id, entry_id).await?;
            return Ok(None);
        }

        let entry = self
            .inventory_repository
            .update_entry(cellar_id, entry_id, &changes)
            .await?
            .ok_or_else(|| entry_not_found(cellar_id, entry_id))?;

        tracing::info!(cellar_id, entry_id, quantity = entry.quantity, "Cellar entry updated");

        Ok(Some(entry))
    }

    /// Removes a live entry from the cellar.
    ///
    /// The entry stays readable for calendar days that reference it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the cellar holds no live entry with this id
    /// - [`AppError::Storage`] on database errors
    pub async fn remove_entry(&self, cellar_id: i64, entry_id: i64) -> Result<(), AppError> {
        if !self
            .inventory_repository
            .remove_entry(cellar_id, entry_id)
            .await?
        {
            return Err(entry_not_found(cellar_id, entry_id));
        }

        tracing::info!(cellar_id, entry_id, "Cellar entry removed");

        Ok(())
    }
}

fn entry_not_found(cellar_id: i64, entry_id: i64) -> AppError {
    AppError::not_found(
        "Cellar entry not found",
        json!({ "cellar_id": cellar_id, "entry_id": entry_id }),
    )
}
