// rust/tilefarm-core/src/lib.rs

//! Tilefarm - Core Library
//!
//! This crate provides the tile assignment state machine behind the render
//! coordinator: image partitioning, the pending/finished tile pools, the
//! cluster readiness gate, request dispatch, progress reporting, and the
//! worker-side HTTP client.

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::CoordinatorConfig;
pub use error::{Result, TilefarmError};

pub mod tiles;
pub use tiles::{AssignmentStore, Progress, ReadinessGate, TileGrid, TileId, TileIndex, TileRect};

pub mod dispatch;
pub use dispatch::{Dispatcher, Operation, Reply};

pub mod protocol;
pub use protocol::TileAssignment;

pub mod status;
pub use status::StatusSnapshot;

pub mod client;
pub use client::{ClientConfig, CoordinatorClient, HttpCoordinatorClient};
