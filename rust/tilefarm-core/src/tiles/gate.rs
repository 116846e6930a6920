//! Admission control: no tiles until the declared cluster has registered.

/// Counts registrations against the expected number of worker threads.
///
/// Registrations are not deduplicated and never expire, so a worker that says
/// hello twice counts twice.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    registered: u64,
    expected: u64,
}

impl ReadinessGate {
    pub fn new(expected_workers: u64) -> Self {
        Self {
            registered: 0,
            expected: expected_workers,
        }
    }

    /// Count one registration and return the new total.
    pub fn register(&mut self) -> u64 {
        self.registered += 1;
        self.registered
    }

    pub fn is_open(&self) -> bool {
        self.registered >= self.expected
    }

    pub fn registered(&self) -> u64 {
        self.registered
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }
}
