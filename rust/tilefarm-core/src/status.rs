//! Progress snapshot and the status line printed by the coordinator.

use std::fmt;

use crate::tiles::Progress;

/// Point-in-time view of the job, taken without mutating any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub registered: u64,
    pub expected_workers: u64,
    pub progress: Progress,
}

impl StatusSnapshot {
    pub fn active_percent(&self) -> f64 {
        percent(self.registered, self.expected_workers)
    }

    pub fn assigned_percent(&self) -> f64 {
        percent(self.progress.assigned, self.progress.total)
    }

    pub fn finished_percent(&self) -> f64 {
        percent(self.progress.finished, self.progress.total)
    }
}

/// `value / total` as a percentage rounded up to two decimals. Zero when
/// `total` is zero.
pub fn percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let hundredths = (u128::from(value) * 10_000).div_ceil(u128::from(total));
    hundredths as f64 / 100.0
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "active={}%, assigned={}%, finished={}%",
            self.active_percent(),
            self.assigned_percent(),
            self.finished_percent()
        )
    }
}
