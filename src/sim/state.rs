//! Particle state and per-tick outputs

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One simulated grain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Left/right decision per peg row (0 = left, 1 = right); fixed at
    /// creation, never mutated
    pub path: Vec<u8>,
    /// Final resting bin = sum of `path`
    pub bin: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Next peg row this grain will interact with; counts up to the row
    /// total, after which the grain targets the settling surface
    pub peg_index: u32,
    /// Terminal: set exactly once, when the grain reaches the surface
    pub settled: bool,
    /// Per-grain random scalar in [0,1); seeds the per-row collision
    /// offset and restitution noise
    pub jitter: f32,
    /// Emission order (0-based), equal to the beat the grain dropped on
    pub beat_index: u32,
}

/// A grain striking a peg: row and peg index within that row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegHit {
    pub row: u32,
    pub col: u32,
}

/// Everything one `update` call produced
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Grains that reached the settling surface this tick; ownership
    /// passes to the caller (the renderer bakes them into the pile)
    pub settled: Vec<Particle>,
    /// Peg collisions this tick, in resolution order
    pub peg_hits: Vec<PegHit>,
    /// Grains emitted this tick (each one is a beat boundary)
    pub emitted: u32,
}
