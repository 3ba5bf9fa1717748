//! Operational endpoints served next to the paymail routes.

pub mod health;

pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;

/// State shared by the health handlers.
#[derive(Clone)]
pub struct AppState {
    pub shutdown: Arc<ShutdownController>,
    /// Number of capability entries advertised at discovery.
    pub capabilities: usize,
    pub start_time: Instant,
}
