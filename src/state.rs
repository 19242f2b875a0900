//! Shared application state injected into handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{CalendarService, CellarService, RecommendationService};
use crate::domain::clock::Clock;
use crate::domain::rng::RngSource;
use crate::infrastructure::persistence::{PgCalendarRepository, PgCellarRepository};

/// Calendar service over the PostgreSQL repositories.
pub type PgCalendarService = CalendarService<PgCellarRepository, PgCalendarRepository>;

/// Inventory service over the PostgreSQL cellar repository.
pub type PgCellarService = CellarService<PgCellarRepository>;

/// Recommendation service over the PostgreSQL cellar repository.
pub type PgRecommendationService = RecommendationService<PgCellarRepository>;

/// Services and handles shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: Arc<PgCalendarService>,
    pub cellar_service: Arc<PgCellarService>,
    pub recommendation_service: Arc<PgRecommendationService>,
    pub db: Arc<PgPool>,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(pool: Arc<PgPool>, rng_source: Arc<dyn RngSource>, clock: Arc<dyn Clock>) -> Self {
        let cellar_repository = Arc::new(PgCellarRepository::new(pool.clone()));
        let calendar_repository = Arc::new(PgCalendarRepository::new(pool.clone()));

        let calendar_service = Arc::new(CalendarService::new(
            cellar_repository.clone(),
            calendar_repository,
            rng_source.clone(),
            clock.clone(),
        ));
        let recommendation_service = Arc::new(RecommendationService::new(
            cellar_repository.clone(),
            rng_source,
            clock,
        ));
        let cellar_service = Arc::new(CellarService::new(cellar_repository));

        Self {
            calendar_service,
            cellar_service,
            recommendation_service,
            db: pool,
        }
    }
}
