//! Business logic services for the application layer.

pub mod calendar_service;
pub mod cellar_service;
pub mod recommendation_service;

pub use calendar_service::{CalendarService, CreateCalendar};
pub use cellar_service::CellarService;
pub use recommendation_service::RecommendationService;
