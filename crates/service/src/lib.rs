//! Shared service infrastructure for the pixlock server.
//!
//! This crate provides the components the deployable binary wires
//! together:
//! - Configuration (explicit, constructed once at startup)
//! - Database (SQLite via sqlx: account and image record queries)
//! - Blob store (raw image bytes, memory or local filesystem backend)
//! - State management (database + blobs + token signer)
//! - HTTP surface (axum routers, one handler module per operation)

pub mod blobs;
pub mod config;
pub mod database;
pub mod http;
pub mod state;

// Re-export key types for convenience
pub use blobs::{BlobStore, BlobStoreConfig, BlobStoreError};
pub use config::Config;
pub use database::{Database, DatabaseSetupError};
pub use state::{State as ServiceState, StateSetupError};
