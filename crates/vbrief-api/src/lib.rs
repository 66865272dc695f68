//! HTTP API for queueing videos and reading reports.
//!
//! This crate provides:
//! - `POST /videos` to queue a URL for summarization
//! - `GET /reports`, `GET /reports/:video_id`, `DELETE /reports/:video_id`
//! - `GET /health` liveness probe

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
