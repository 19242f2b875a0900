//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod calendars;
pub mod cellars;
pub mod health;
pub mod recommendations;

pub use calendars::{
    create_calendar_handler, delete_calendar_handler, find_calendar_handler, get_calendar_handler,
    regenerate_day_handler, reveal_day_handler, toggle_reveal_handler,
};
pub use cellars::{cellar_stats_handler, remove_entry_handler, update_entry_handler};
pub use health::health_handler;
pub use recommendations::{recommend_handler, recommendation_params_handler};
