//! Tile bookkeeping for a render job.
//!
//! This module provides the pieces the dispatcher composes:
//!
//! - [`TileGrid`]: partitions the image into square tiles
//! - [`AssignmentStore`]: hands out each tile once and records completion
//! - [`ReadinessGate`]: withholds tiles until the declared cluster has registered

mod gate;
mod grid;
mod store;

/// Index of a tile in row-major order, `0..total_tiles`.
pub type TileIndex = u32;

/// Identifier reported back by a worker on completion. Any integer is
/// accepted, including ids that were never handed out.
pub type TileId = i64;

pub use gate::ReadinessGate;
pub use grid::{TileGrid, TileRect};
pub use store::{AssignmentStore, Progress};
