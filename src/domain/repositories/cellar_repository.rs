//! Repository trait for reading cellar inventory.

use crate::domain::entities::{CellarEntry, RecommendationParams};
use crate::domain::filter_compiler::CompiledPredicate;
use crate::error::AppError;
use async_trait::async_trait;

/// Which cellar entries a read may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryVisibility {
    /// Only entries still in the cellar.
    Live,
    /// Also entries that have been removed from the cellar. Used wherever a
    /// historical reference must stay resolvable, such as calendar days.
    IncludingRemoved,
}

/// Candidate source for recommendations.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCellarRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_cellar.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CellarRepository: Send + Sync {
    /// Returns live entries of the cellar matching every clause of `predicate`.
    ///
    /// An empty predicate returns the whole live cellar. The result is ordered
    /// by entry id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn fetch_candidates(
        &self,
        cellar_id: i64,
        predicate: &CompiledPredicate,
    ) -> Result<Vec<CellarEntry>, AppError>;

    /// Computes filter bounds over the cellar's live entries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn recommendation_params(&self, cellar_id: i64)
    -> Result<RecommendationParams, AppError>;
}
