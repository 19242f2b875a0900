//! HTTP middleware for request processing.
//!
//! Provides request tracing and per-request deadlines.

pub mod timeout;
pub mod tracing;
