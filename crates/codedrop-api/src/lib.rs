//! # codedrop-api
//!
//! HTTP API layer for CodeDrop built on Axum.
//!
//! Provides the issue, redeem, and health endpoints, static serving of
//! locally stored files, middleware (CORS, request logging, redemption
//! rate limiting), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
