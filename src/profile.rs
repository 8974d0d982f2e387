//! Physics constant bundles
//!
//! Each simulation holds its own `PhysicsProfile` snapshot; swapping a
//! preset mid-run only affects that instance, never a shared global.

use serde::{Deserialize, Serialize};

/// Named physics presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    #[default]
    Standard,
    HeavySand,
    Techno,
    MoonGravity,
    SuperBall,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Standard => "standard",
            Preset::HeavySand => "heavy sand",
            Preset::Techno => "techno",
            Preset::MoonGravity => "moon gravity",
            Preset::SuperBall => "super ball",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "standard" => Some(Preset::Standard),
            "heavy sand" | "heavy-sand" => Some(Preset::HeavySand),
            "techno" => Some(Preset::Techno),
            "moon gravity" | "moon-gravity" => Some(Preset::MoonGravity),
            "super ball" | "super-ball" => Some(Preset::SuperBall),
            _ => None,
        }
    }
}

/// Tunable physics constants consumed every simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsProfile {
    /// Base fraction of normal velocity preserved on a peg bounce
    pub restitution: f32,
    /// Per-hit jittered addition to `restitution`
    pub restitution_range: f32,
    /// Blend fraction pulling a grain toward its path-determined peg
    /// center before deflection
    pub nudge: f32,
    /// Horizontal drag coefficient while falling through the grid
    pub drag_x: f32,
    /// Vertical drag coefficient while falling through the grid
    pub drag_y: f32,
    /// Horizontal drag once past the last peg row (near the pile)
    pub drag_x_settle: f32,
    /// Vertical drag once past the last peg row
    pub drag_y_settle: f32,
    /// Downward acceleration, pixels/s²
    pub gravity: f32,
}

impl Default for PhysicsProfile {
    fn default() -> Self {
        Self::preset(Preset::Standard)
    }
}

impl PhysicsProfile {
    /// Constants for a named preset
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Standard => Self {
                restitution: 0.20,
                restitution_range: 0.08,
                nudge: 0.08,
                drag_x: 3.0,
                drag_y: 1.5,
                drag_x_settle: 6.0,
                drag_y_settle: 3.0,
                gravity: 800.0,
            },
            Preset::HeavySand => Self {
                restitution: 0.01,
                restitution_range: 0.02,
                nudge: 0.10,
                drag_x: 6.0,
                drag_y: 2.0,
                drag_x_settle: 14.0,
                drag_y_settle: 7.0,
                gravity: 1400.0,
            },
            Preset::Techno => Self {
                restitution: 0.0,
                restitution_range: 0.0,
                nudge: 0.15,
                drag_x: 10.0,
                drag_y: 1.0,
                drag_x_settle: 18.0,
                drag_y_settle: 4.0,
                gravity: 1600.0,
            },
            Preset::MoonGravity => Self {
                restitution: 0.08,
                restitution_range: 0.03,
                nudge: 0.12,
                drag_x: 2.0,
                drag_y: 0.08,
                drag_x_settle: 3.0,
                drag_y_settle: 0.8,
                gravity: 50.0,
            },
            Preset::SuperBall => Self {
                restitution: 0.70,
                restitution_range: 0.15,
                nudge: 0.04,
                drag_x: 0.8,
                drag_y: 0.4,
                drag_x_settle: 2.5,
                drag_y_settle: 1.2,
                gravity: 800.0,
            },
        }
    }
}
