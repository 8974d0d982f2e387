//! The beat-synced Galton simulation
//!
//! Emission is a pure function of injected elapsed time: the number of
//! grains that exist is derived analytically from the beat interval every
//! tick, so a stalled renderer catches up by emitting several grains in
//! one call rather than by replaying small time steps. Physics uses
//! continuous collision against peg rows and the settling surface, stable
//! at any frame rate.

use glam::Vec2;

use crate::board::BoardGeom;
use crate::config::SimConfig;
use crate::consts::{BOARD_MARGIN_ROWS, MAX_TICK_MS, MS_PER_MINUTE, PEG_COLLISION_FRAC};
use crate::profile::PhysicsProfile;
use crate::rng::SeededRng;

use super::collision::{advance, bounce_jitter, deflect, time_to_hit};
use super::state::{Particle, PegHit, TickOutput};

/// Slack in the beat quotient. `update_bpm` re-derives elapsed time as
/// beat-count * interval; without this, `floor((k * i) / i)` can land on
/// k-1 in floating point and shift every later beat. Far below one beat
/// at any supported tempo, far above f64 rounding error at any
/// supported run length.
const BEAT_QUOTIENT_EPS: f64 = 1e-9;

/// One playback run's particle state machine.
///
/// Preconditions (debug-asserted, not defended at runtime): `bpm` finite
/// and positive; geometry passed to `update` consistent with the
/// `BoardGeom` contract. `num_rows = 0` is valid and degenerates to a
/// single bin.
#[derive(Debug, Clone)]
pub struct Simulation {
    num_rows: u32,
    total_particles: u32,
    emit_interval_ms: f64,
    total_time_ms: f64,
    profile: PhysicsProfile,
    rng: SeededRng,
    active: Vec<Particle>,
    bin_counts: Vec<u32>,
    emitted_count: u32,
    elapsed_ms: f64,
    all_emitted: bool,
    all_settled: bool,
}

impl Simulation {
    /// One grain per beat: `total_beats` is the whole particle budget.
    pub fn new(num_rows: u32, total_beats: u32, bpm: f64, seed: u32) -> Self {
        Self::with_profile(num_rows, total_beats, bpm, seed, PhysicsProfile::default())
    }

    pub fn with_profile(
        num_rows: u32,
        total_beats: u32,
        bpm: f64,
        seed: u32,
        profile: PhysicsProfile,
    ) -> Self {
        debug_assert!(bpm.is_finite() && bpm > 0.0, "bpm must be positive");
        let emit_interval_ms = MS_PER_MINUTE / bpm;
        Self {
            num_rows,
            total_particles: total_beats,
            emit_interval_ms,
            total_time_ms: total_beats.saturating_sub(1) as f64 * emit_interval_ms,
            profile,
            rng: SeededRng::new(seed),
            active: Vec::new(),
            bin_counts: vec![0; num_rows as usize + 1],
            emitted_count: 0,
            elapsed_ms: 0.0,
            all_emitted: false,
            all_settled: false,
        }
    }

    /// Build from a sanitized configuration surface
    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::with_profile(
            cfg.rows,
            cfg.total_beats(),
            cfg.bpm as f64,
            cfg.seed,
            PhysicsProfile::preset(cfg.preset),
        )
    }

    /// Advance the simulation by `dt_ms` of physics time.
    ///
    /// `dt_ms` is clamped to 100 ms; emission ignores it entirely and
    /// reconciles against the externally injected elapsed time, so any
    /// backlog is caught up exactly in this one call. `ground_y` maps a
    /// horizontal position to the current settling-surface height and is
    /// treated as authoritative.
    pub fn update<G, F>(&mut self, dt_ms: f64, geom: &G, ground_y: F) -> TickOutput
    where
        G: BoardGeom,
        F: Fn(f32) -> f32,
    {
        debug_assert!(dt_ms.is_finite() && dt_ms >= 0.0);
        let dt = (dt_ms.min(MAX_TICK_MS) / 1000.0) as f32;
        let mut out = TickOutput::default();

        // Emission reconciliation: create exactly the grains that should
        // exist by now (zero, one, or many after a stall)
        if !self.all_emitted {
            let expected = self.expected_emitted();
            while self.emitted_count < expected {
                let p = self.create_particle(geom);
                self.active.push(p);
                out.emitted += 1;
            }
            if self.emitted_count >= self.total_particles {
                self.all_emitted = true;
            }
        }

        let g = self.profile.gravity;
        let half_board =
            geom.peg_spacing() * (self.num_rows as f32 / 2.0 + BOARD_MARGIN_ROWS);
        let peg_r = geom.peg_spacing() * PEG_COLLISION_FRAC;
        let max_ccd_iter = self.num_rows + 2;

        let particles = std::mem::take(&mut self.active);
        let mut alive = Vec::with_capacity(particles.len());

        'grains: for mut p in particles {
            let settling = p.peg_index >= self.num_rows;
            let (dx_coeff, dy_coeff) = if settling {
                (self.profile.drag_x_settle, self.profile.drag_y_settle)
            } else {
                (self.profile.drag_x, self.profile.drag_y)
            };
            p.vel.x *= (-dx_coeff * dt).exp();
            p.vel.y *= (-dy_coeff * dt).exp();

            let mut remain = dt;

            for _ in 0..max_ccd_iter {
                if remain <= 0.0 {
                    break;
                }
                if p.peg_index < self.num_rows {
                    let row = p.peg_index;
                    let row_y = geom.peg_y(row);
                    let t_hit = time_to_hit(p.pos.y, p.vel.y, g, row_y);

                    if t_hit > remain {
                        advance(&mut p, remain, g);
                        break;
                    }

                    // Advance exactly to the collision instant
                    p.pos.x += p.vel.x * t_hit;
                    p.vel.y += g * t_hit;
                    p.pos.y = row_y;
                    remain -= t_hit;

                    let dir = p.path[row as usize];
                    let bj = bounce_jitter(p.jitter, row);
                    let col: u32 = p.path[..row as usize].iter().map(|&d| d as u32).sum();
                    let peg_cx = geom.peg_x(row, col);

                    deflect(&mut p, peg_cx, peg_r, dir, bj, &self.profile);
                    out.peg_hits.push(PegHit { row, col });
                    p.peg_index += 1;
                } else {
                    let floor = ground_y(p.pos.x);
                    let t_ground = time_to_hit(p.pos.y, p.vel.y, g, floor);

                    if t_ground > remain {
                        advance(&mut p, remain, g);
                        break;
                    }

                    p.pos.x += p.vel.x * t_ground;
                    p.pos.y = floor;
                    p.settled = true;
                    self.bin_counts[p.bin as usize] += 1;
                    out.settled.push(p);
                    continue 'grains;
                }
            }

            let emit_x = geom.emit_x();
            p.pos.x = p.pos.x.clamp(emit_x - half_board, emit_x + half_board);
            alive.push(p);
        }

        self.active = alive;
        if self.all_emitted && self.active.is_empty() {
            self.all_settled = true;
        }
        out
    }

    /// Inject the authoritative elapsed time. The simulation never reads
    /// a wall clock; whoever drives this owns beat timing.
    pub fn set_elapsed_ms(&mut self, ms: f64) {
        if ms < self.elapsed_ms {
            log::debug!(
                "elapsed time moved backward: {:.1} -> {:.1} ms",
                self.elapsed_ms,
                ms
            );
        }
        self.elapsed_ms = ms;
    }

    /// Current beat count: how many beats have started by now, capped at
    /// the particle budget
    pub fn current_beat(&self) -> u32 {
        self.expected_emitted()
    }

    /// Current bar (0-based)
    pub fn current_bar(&self, beats_per_bar: u32) -> u32 {
        debug_assert!(beats_per_bar > 0);
        self.current_beat() / beats_per_bar
    }

    /// Live tempo change without discarding state. Elapsed time is
    /// re-derived from the current beat count under the new interval, so
    /// `current_beat()` is unchanged and the next emission reconciliation
    /// neither skips nor repeats a grain. Returns the new total run time
    /// for the external clock to adopt.
    pub fn update_bpm(&mut self, new_bpm: f64) -> f64 {
        debug_assert!(new_bpm.is_finite() && new_bpm > 0.0, "bpm must be positive");
        let beat = self.current_beat();
        self.emit_interval_ms = MS_PER_MINUTE / new_bpm;
        self.elapsed_ms = beat.saturating_sub(1) as f64 * self.emit_interval_ms;
        self.total_time_ms =
            self.total_particles.saturating_sub(1) as f64 * self.emit_interval_ms;
        self.total_time_ms
    }

    /// Emit every grain due at the current elapsed time directly into the
    /// settled state, skipping physics. Used when a backgrounded caller
    /// resumes and chooses not to animate the backlog.
    pub fn instant_snap<G: BoardGeom>(&mut self, geom: &G) -> Vec<Particle> {
        let expected = self.expected_emitted();
        let mut settled = Vec::new();
        while self.emitted_count < expected {
            let mut p = self.create_particle(geom);
            p.settled = true;
            p.peg_index = self.num_rows;
            self.bin_counts[p.bin as usize] += 1;
            settled.push(p);
        }
        if self.emitted_count >= self.total_particles {
            self.all_emitted = true;
        }
        settled
    }

    /// Settle every active grain immediately, without further physics
    pub fn force_settle_active(&mut self) -> Vec<Particle> {
        let mut settled = std::mem::take(&mut self.active);
        for p in &mut settled {
            p.settled = true;
            p.peg_index = self.num_rows;
            self.bin_counts[p.bin as usize] += 1;
        }
        settled
    }

    /// Swap the physics constants for subsequent ticks
    pub fn set_profile(&mut self, profile: PhysicsProfile) {
        self.profile = profile;
    }

    /// Grains that should exist at the current elapsed time. Saturates
    /// against grains already emitted: a backward time jump emits nothing
    /// and never un-emits.
    fn expected_emitted(&self) -> u32 {
        let beats = (self.elapsed_ms / self.emit_interval_ms + BEAT_QUOTIENT_EPS).floor() + 1.0;
        beats.clamp(0.0, self.total_particles as f64) as u32
    }

    fn create_particle<G: BoardGeom>(&mut self, geom: &G) -> Particle {
        let mut path = Vec::with_capacity(self.num_rows as usize);
        let mut bin = 0u32;
        for _ in 0..self.num_rows {
            let d = self.rng.flip();
            path.push(d);
            bin += d as u32;
        }
        let beat_index = self.emitted_count;
        self.emitted_count += 1;
        Particle {
            path,
            bin,
            pos: Vec2::new(geom.emit_x(), geom.emit_y()),
            vel: Vec2::ZERO,
            peg_index: 0,
            settled: false,
            jitter: self.rng.next_unit(),
            beat_index,
        }
    }

    // ── Read accessors ──

    #[inline]
    pub fn active(&self) -> &[Particle] {
        &self.active
    }

    #[inline]
    pub fn bin_counts(&self) -> &[u32] {
        &self.bin_counts
    }

    #[inline]
    pub fn emitted_count(&self) -> u32 {
        self.emitted_count
    }

    #[inline]
    pub fn total_particles(&self) -> u32 {
        self.total_particles
    }

    #[inline]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    #[inline]
    pub fn emit_interval_ms(&self) -> f64 {
        self.emit_interval_ms
    }

    #[inline]
    pub fn total_time_ms(&self) -> f64 {
        self.total_time_ms
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    #[inline]
    pub fn all_emitted(&self) -> bool {
        self.all_emitted
    }

    #[inline]
    pub fn all_settled(&self) -> bool {
        self.all_settled
    }

    #[inline]
    pub fn profile(&self) -> &PhysicsProfile {
        &self.profile
    }
}
