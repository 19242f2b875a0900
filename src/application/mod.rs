//! Application layer services implementing business logic.
//!
//! Services orchestrate the domain: they compile filters, call repository
//! traits, run selection and decide what gets persisted. HTTP handlers and the
//! admin CLI only talk to services.
//!
//! # Available Services
//!
//! - [`services::calendar_service::CalendarService`] - Advent calendar build, regeneration, reveal, lookup and deletion
//! - [`services::recommendation_service::RecommendationService`] - Single recommendations and filter bounds

pub mod services;
