//! HealthInsight prediction server — library interface.
//!
//! Re-exports the application state, router, and handlers so that
//! integration tests can programmatically construct the service.

pub mod config;
pub mod routes;
pub mod shutdown;

// Re-export key types for convenience
pub use routes::{build_router, features_handler, health_handler, predict_handler, AppState};
