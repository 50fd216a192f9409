//! # Axum Helpers
//!
//! A collection of utilities and helpers for building Axum web applications.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (UUID path, validated JSON)
//! - **[`health`]**: Health check endpoint
//! - **[`server`]**: Router assembly, server startup, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod health;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

// Re-export server helpers
pub use health::{HealthResponse, health_handler};
pub use server::{create_app, create_router, shutdown_signal};
