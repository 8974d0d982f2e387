//! Run configuration
//!
//! Bounds live here, not in the core: `Simulation` trusts its inputs and
//! this surface is where out-of-range values get clamped. The query-string
//! codec is forgiving; malformed values fall back to defaults so a
//! hand-edited share link still produces a run.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::profile::Preset;

/// Configuration surface consumed at simulation construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Beats per minute, clamped to 20..=300
    pub bpm: u32,
    /// Bars in the run, clamped to 1..=999 (4 beats each)
    pub bars: u32,
    /// Peg rows, clamped to 4..=64
    pub rows: u32,
    /// RNG seed; 0 means "let the caller pick one"
    pub seed: u32,
    /// Physics preset
    pub preset: Preset,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bpm: 120,
            bars: 128,
            rows: 24,
            seed: 0,
            preset: Preset::Standard,
        }
    }
}

impl SimConfig {
    /// Total particle budget: one grain per beat
    #[inline]
    pub fn total_beats(&self) -> u32 {
        self.bars * BEATS_PER_BAR
    }

    /// Clamp every field into its supported range
    pub fn sanitize(mut self) -> Self {
        self.bpm = self.bpm.clamp(MIN_BPM, MAX_BPM);
        self.bars = self.bars.clamp(MIN_BARS, MAX_BARS);
        self.rows = self.rows.clamp(MIN_ROWS, MAX_ROWS);
        self
    }

    /// Parse a `key=value&key=value` query string. Unknown keys are
    /// ignored; unparseable values keep their defaults. Always clamps.
    pub fn from_query(query: &str) -> Self {
        let mut cfg = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "bpm" => cfg.bpm = value.parse().unwrap_or(cfg.bpm),
                "bars" => cfg.bars = value.parse().unwrap_or(cfg.bars),
                "rows" => cfg.rows = value.parse().unwrap_or(cfg.rows),
                "s" => cfg.seed = value.parse().unwrap_or(cfg.seed),
                "mode" => {
                    cfg.preset = Preset::from_str(value).unwrap_or(cfg.preset);
                }
                _ => {}
            }
        }
        cfg.sanitize()
    }

    /// Serialize to the same query form `from_query` reads
    pub fn to_query(&self) -> String {
        format!(
            "bpm={}&bars={}&rows={}&s={}&mode={}",
            self.bpm,
            self.bars,
            self.rows,
            self.seed,
            self.preset.as_str().replace(' ', "-"),
        )
    }
}
