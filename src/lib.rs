//! Galton Tempo - a Galton-board rhythm machine
//!
//! Grains drop on musical beats, ricochet through a triangular peg grid,
//! and pile up into a binomial distribution. Core modules:
//! - `sim`: Deterministic simulation (emission, continuous collision, settling)
//! - `board`: Board geometry contract + triangular layout + bin stacks
//! - `clock`: Beat clock (the sole time authority)
//! - `profile`: Physics constant bundles and named presets
//! - `config`: Bounded configuration surface + query-string codec
//! - `rng`: Seeded deterministic RNG

pub mod board;
pub mod clock;
pub mod config;
pub mod profile;
pub mod rng;
pub mod sim;

pub use board::{BinStacks, BoardGeom, BoardLayout};
pub use clock::{BeatClock, ClockTick};
pub use config::SimConfig;
pub use profile::{PhysicsProfile, Preset};
pub use rng::SeededRng;
pub use sim::{Particle, PegHit, Simulation, TickOutput, max_bin_probability};

/// Simulation configuration constants
pub mod consts {
    /// Milliseconds in one minute (beat interval = MS_PER_MINUTE / bpm)
    pub const MS_PER_MINUTE: f64 = 60_000.0;
    /// Beats per bar (fixed 4/4 time)
    pub const BEATS_PER_BAR: u32 = 4;

    /// Maximum simulated time per update call, in milliseconds.
    /// Bounds integration error after a stall (e.g. a backgrounded tab);
    /// emission catch-up is analytic and unaffected by this clamp.
    pub const MAX_TICK_MS: f64 = 100.0;

    /// Peg collision radius as a fraction of peg spacing
    pub const PEG_COLLISION_FRAC: f32 = 0.30;
    /// Horizontal clamp margin, in rows of spacing past the half board
    pub const BOARD_MARGIN_ROWS: f32 = 1.5;

    /// Row spacing ratio for the triangular grid: sqrt(3)/2
    pub const SQRT3_2: f32 = 0.866_025_4;

    /// Configuration bounds (policy of the config surface, not the core)
    pub const MIN_BPM: u32 = 20;
    pub const MAX_BPM: u32 = 300;
    pub const MIN_BARS: u32 = 1;
    pub const MAX_BARS: u32 = 999;
    pub const MIN_ROWS: u32 = 4;
    pub const MAX_ROWS: u32 = 64;
}

/// Fractional part of x, in [0, 1) for finite non-negative inputs
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
