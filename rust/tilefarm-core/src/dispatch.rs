//! Request-driven state machine for a render job.
//!
//! Each inbound request maps to one [`Operation`], which [`Dispatcher::dispatch`]
//! applies to the tile state as a single step. The caller is responsible for
//! serializing calls (the coordinator holds a write lock around each one).

use rand::Rng;

use crate::config::CoordinatorConfig;
use crate::error::{Result, TilefarmError};
use crate::protocol::{self, TileAssignment};
use crate::status::StatusSnapshot;
use crate::tiles::{AssignmentStore, ReadinessGate, TileGrid, TileId, TileIndex};

/// A worker request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A worker thread announces itself.
    Register,
    /// A worker asks for the next tile.
    RequestTile,
    /// A worker reports a tile as rendered.
    ReportDone(TileId),
}

impl Operation {
    /// Map a request path and raw query string to an operation.
    ///
    /// # Errors
    ///
    /// Returns `UnknownOperation` for unrecognised paths and `InvalidTileId`
    /// when `/done` lacks an integer `t` parameter.
    pub fn from_request(path: &str, query: Option<&str>) -> Result<Self> {
        match path {
            protocol::HELLO_PATH => Ok(Self::Register),
            protocol::TILE_PATH => Ok(Self::RequestTile),
            protocol::DONE_PATH => {
                let raw = query
                    .and_then(|q| protocol::query_value(q, protocol::DONE_QUERY_KEY))
                    .unwrap_or_default();
                raw.parse()
                    .map(Self::ReportDone)
                    .map_err(|_| TilefarmError::invalid_tile_id(raw))
            }
            other => Err(TilefarmError::unknown_operation(other)),
        }
    }
}

/// Outcome of a dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Success with no payload. For `RequestTile` this means "no work right now".
    Empty,
    Tile(TileAssignment),
}

impl Reply {
    /// Response body as sent on the wire.
    pub fn body(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Tile(assignment) => assignment.to_string(),
        }
    }
}

/// Owns all mutable job state: the tile pool, the finished set and the
/// registration count.
#[derive(Debug)]
pub struct Dispatcher {
    grid: TileGrid,
    store: AssignmentStore,
    gate: ReadinessGate,
}

impl Dispatcher {
    pub fn new(grid: TileGrid, store: AssignmentStore, gate: ReadinessGate) -> Self {
        Self { grid, store, gate }
    }

    /// Build the dispatcher for a validated configuration.
    pub fn from_config(config: &CoordinatorConfig) -> Self {
        let grid = config.grid();
        let total = TileIndex::try_from(grid.total_tiles()).unwrap_or(TileIndex::MAX);
        Self::new(
            grid,
            AssignmentStore::shuffled(total, config.seed),
            ReadinessGate::new(config.cluster.expected_workers()),
        )
    }

    /// Like [`Dispatcher::from_config`] but shuffling with the given generator.
    pub fn with_rng<R: Rng + ?Sized>(grid: TileGrid, expected_workers: u64, rng: &mut R) -> Self {
        let total = TileIndex::try_from(grid.total_tiles()).unwrap_or(TileIndex::MAX);
        Self::new(
            grid,
            AssignmentStore::new(total, rng),
            ReadinessGate::new(expected_workers),
        )
    }

    /// Apply one operation.
    pub fn dispatch(&mut self, op: Operation) -> Reply {
        match op {
            Operation::Register => {
                let registered = self.gate.register();
                tracing::debug!(registered, expected = self.gate.expected(), "worker registered");
                Reply::Empty
            }
            Operation::RequestTile => self.request_tile(),
            Operation::ReportDone(id) => {
                if self.store.mark_done(id) {
                    tracing::debug!(tile = id, "tile done");
                } else {
                    tracing::debug!(tile = id, "tile already reported done");
                }
                Reply::Empty
            }
        }
    }

    fn request_tile(&mut self) -> Reply {
        if !self.gate.is_open() {
            return Reply::Empty;
        }

        match self.store.allocate_next() {
            Some(index) => {
                let rect = self.grid.tile_rect(index);
                tracing::debug!(tile = index, %rect, "tile assigned");
                Reply::Tile(TileAssignment { index, rect })
            }
            None => Reply::Empty,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            registered: self.gate.registered(),
            expected_workers: self.gate.expected(),
            progress: self.store.progress(),
        }
    }
}
