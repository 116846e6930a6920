//! Tilefarm coordinator service.
//!
//! Hands out render tiles to a cluster of workers over plain HTTP. The
//! binary in `main.rs` wires these pieces to the command line.

pub mod service;
pub mod state;
pub mod status;

pub use service::{router, serve};
pub use state::CoordinatorState;
pub use status::spawn_status_reporter;
