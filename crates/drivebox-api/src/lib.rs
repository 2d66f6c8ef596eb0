//! # drivebox-api
//!
//! HTTP API layer for DriveBox built on Axum.
//!
//! Provides the REST endpoints, the authenticated-user extractor, DTOs,
//! and the mapping from domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
