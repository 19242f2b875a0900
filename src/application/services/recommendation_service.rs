//! Ad-hoc beer recommendations from a cellar.

use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::entities::{CellarEntry, Filter, RecommendationParams};
use crate::domain::filter_compiler::compile;
use crate::domain::repositories::CellarRepository;
use crate::domain::rng::RngSource;
use crate::domain::selector::pick_any;
use crate::error::AppError;

/// Service for one-off recommendations and the filter bounds a client offers.
///
/// Unlike calendar building there is nothing to keep unique here, so a filter
/// that matches nothing is an empty answer rather than an error.
pub struct RecommendationService<C: CellarRepository> {
    cellar_repository: Arc<C>,
    rng_source: Arc<dyn RngSource>,
    clock: Arc<dyn Clock>,
}

impl<C: CellarRepository> RecommendationService<C> {
    /// Creates a new recommendation service.
    pub fn new(
        cellar_repository: Arc<C>,
        rng_source: Arc<dyn RngSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cellar_repository,
            rng_source,
            clock,
        }
    }

    /// Recommends one live entry matching `filter`, chosen uniformly at random.
    ///
    /// Returns `Ok(None)` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn recommend(
        &self,
        cellar_id: i64,
        filter: &Filter,
    ) -> Result<Option<CellarEntry>, AppError> {
        tracing::debug!(
            cellar_id,
            unconstrained = filter.is_unconstrained(),
            "Recommending from cellar"
        );

        let predicate = compile(filter, self.clock.now());
        let candidates = self
            .cellar_repository
            .fetch_candidates(cellar_id, &predicate)
            .await?;

        if candidates.is_empty() {
            tracing::debug!(cellar_id, "No recommendation candidates");
            return Ok(None);
        }

        let mut rng = self.rng_source.rng();
        Ok(pick_any(&candidates, &mut rng).cloned())
    }

    /// Returns the breweries, styles and value ranges present in a cellar.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn recommendation_params(
        &self,
        cellar_id: i64,
    ) -> Result<RecommendationParams, AppError> {
        self.cellar_repository.recommendation_params(cellar_id).await
    }
}
