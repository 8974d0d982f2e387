//! Deterministic beat-synced particle simulation
//!
//! All run outcomes are decided here. This module must be pure and
//! deterministic:
//! - Seeded RNG only, one stream, draws in emission order
//! - Elapsed time injected by the caller, never measured here
//! - No rendering, audio, or platform dependencies
//!
//! Side effects leave as data: every `update` returns the particles that
//! settled and the peg hits that occurred during that tick.

pub mod collision;
pub mod simulation;
pub mod state;
pub mod stats;

pub use collision::time_to_hit;
pub use simulation::Simulation;
pub use state::{Particle, PegHit, TickOutput};
pub use stats::max_bin_probability;
