//! Pool of unassigned tiles and the set of finished ones.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{TileId, TileIndex};

/// Counters describing how far a job has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Tiles handed out so far.
    pub assigned: u64,
    /// Distinct ids reported as done. Can exceed `total` when workers report
    /// ids that were never assigned.
    pub finished: u64,
    pub total: u64,
}

/// Owns the pending pool, the assignment counter and the finished set.
///
/// The pool is shuffled once up front and drained from the end, which spreads
/// neighbouring tiles across workers.
#[derive(Debug)]
pub struct AssignmentStore {
    pending: Vec<TileIndex>,
    assigned: u64,
    finished: HashSet<TileId>,
    total: u64,
}

impl AssignmentStore {
    /// Create a store for `total_tiles` tiles, shuffled with `rng`.
    pub fn new<R: Rng + ?Sized>(total_tiles: TileIndex, rng: &mut R) -> Self {
        let mut pending: Vec<TileIndex> = (0..total_tiles).collect();
        pending.shuffle(rng);

        Self {
            pending,
            assigned: 0,
            finished: HashSet::new(),
            total: u64::from(total_tiles),
        }
    }

    /// Create a store shuffled from `seed`, or from OS entropy when `None`.
    pub fn shuffled(total_tiles: TileIndex, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(total_tiles, &mut rng)
    }

    /// Take the next unassigned tile. `None` means every tile has been handed out.
    pub fn allocate_next(&mut self) -> Option<TileIndex> {
        let index = self.pending.pop()?;
        self.assigned += 1;
        Some(index)
    }

    /// Record `id` as finished. Repeated or unknown ids are accepted.
    ///
    /// Returns `true` if the id was not already recorded.
    pub fn mark_done(&mut self, id: TileId) -> bool {
        self.finished.insert(id)
    }

    pub fn is_finished(&self, id: TileId) -> bool {
        self.finished.contains(&id)
    }

    /// Number of tiles still waiting to be handed out.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            assigned: self.assigned,
            finished: self.finished.len() as u64,
            total: self.total,
        }
    }
}
