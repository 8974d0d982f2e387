//! Continuous collision detection
//!
//! The tricky part of the board: a grain must never tunnel through a peg
//! row, at any frame rate or gravity preset. Instead of stepping, the
//! integrator solves for the exact time the grain's ballistic arc reaches
//! the next obstacle and advances straight to that instant.

use crate::fract;
use crate::profile::PhysicsProfile;

use super::state::Particle;

/// Gravity below this is treated as zero (linear motion fallback)
const GRAVITY_EPS: f32 = 1e-6;
/// Roots and velocities below this are not a usable approach
const TINY: f32 = 1e-9;

/// Time until a body at `y` with vertical velocity `vy` under constant
/// gravity `g` reaches `target_y` (downward-positive coordinates).
///
/// Returns 0 when already at or past the target, and infinity when the
/// arc never gets there (no positive real root).
pub fn time_to_hit(y: f32, vy: f32, g: f32, target_y: f32) -> f32 {
    let dy = target_y - y;
    if dy <= 0.0 {
        return 0.0;
    }
    if g.abs() < GRAVITY_EPS {
        return if vy > TINY { dy / vy } else { f32::INFINITY };
    }
    let disc = vy * vy + 2.0 * g * dy;
    if disc < 0.0 {
        return f32::INFINITY;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-vy + sqrt_disc) / g;
    let t2 = (-vy - sqrt_disc) / g;
    let mut t = f32::INFINITY;
    if t1 > TINY {
        t = t1;
    }
    if t2 > TINY && t2 < t {
        t = t2;
    }
    t
}

/// Ballistic advance by `t` seconds under gravity `g`
#[inline]
pub(crate) fn advance(p: &mut Particle, t: f32, g: f32) {
    p.pos.x += p.vel.x * t;
    p.pos.y += p.vel.y * t + 0.5 * g * t * t;
    p.vel.y += g * t;
}

/// Per-row bounce noise derived from the grain's fixed jitter scalar.
/// A cheap hash mix, not a fresh RNG draw: replays stay identical.
#[inline]
pub(crate) fn bounce_jitter(jitter: f32, row: u32) -> f32 {
    fract(jitter * 997.0 + row as f32 * 7.31)
}

/// Resolve a grain arriving exactly at a peg row.
///
/// The grain is first blended toward the peg center dictated by its
/// predetermined path (the nudge), then given a jittered minimum
/// horizontal offset in its path direction so the deflection reads
/// left-or-right even though the reflection itself is continuous. The
/// offset, clamped to the collision radius, yields a circular-surface
/// normal; velocity reflects about it with jittered restitution, only
/// when actually moving into the peg.
pub(crate) fn deflect(
    p: &mut Particle,
    peg_cx: f32,
    peg_r: f32,
    dir: u8,
    bj: f32,
    profile: &PhysicsProfile,
) {
    p.pos.x = p.pos.x * (1.0 - profile.nudge) + peg_cx * profile.nudge;

    let mut dx = p.pos.x - peg_cx;
    let min_off = peg_r * (0.10 + 0.12 * bj);
    if dir == 1 && dx < min_off {
        dx = min_off;
    }
    if dir == 0 && dx > -min_off {
        dx = -min_off;
    }
    dx = dx.clamp(-peg_r, peg_r);

    let frac = dx / peg_r;
    let nx = frac;
    let ny = -(1.0 - frac * frac).max(0.0).sqrt();

    let v_dot_n = p.vel.x * nx + p.vel.y * ny;
    if v_dot_n < 0.0 {
        let e = profile.restitution + profile.restitution_range * bj;
        p.vel.x -= (1.0 + e) * v_dot_n * nx;
        p.vel.y -= (1.0 + e) * v_dot_n * ny;
    }
}
