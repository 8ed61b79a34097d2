//! carpool-api — HTTP API for the carpool matching service.
//!
//! Provides axum route handlers over one shared `MatchingService`.
//! Requests are serialized through a single lock; the service itself
//! does no synchronization.
//!
//! # API Routes
//!
//! | Method | Path | Body | Description |
//! |---|---|---|---|
//! | GET | `/status` | | Fleet counters |
//! | PUT | `/cars` | JSON `[{"id", "seats"}]` | Load a fleet, discarding all groups |
//! | POST | `/journey` | JSON `{"id", "people"}` | Register a group journey |
//! | POST | `/dropoff` | form `ID=<id>` | Drop off (or cancel) a group |
//! | POST | `/locate` | form `ID=<id>` | Car of a group; 204 while waiting |
//!
//! Any other method on these paths answers 405.

pub mod error;
pub mod handlers;
pub mod payload;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use carpool_core::MatchingConfig;
use carpool_scheduler::MatchingService;

pub use error::ApiError;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<Mutex<MatchingService>>,
    /// Used to rebuild the service on `PUT /cars`.
    pub matching: MatchingConfig,
}

impl ApiState {
    pub fn new(service: MatchingService, matching: MatchingConfig) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            matching,
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/cars", put(handlers::load_cars))
        .route("/journey", post(handlers::journey))
        .route("/dropoff", post(handlers::dropoff))
        .route("/locate", post(handlers::locate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
