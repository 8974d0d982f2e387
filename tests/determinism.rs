//! End-to-end determinism and invariant checks
//!
//! Two simulations built from the same seed and driven with the same tick
//! sequence must agree bit-for-bit; the structural invariants must hold
//! for every preset and board size.

use galton_tempo::{BinStacks, BoardLayout, PhysicsProfile, Preset, SeededRng, Simulation};

const FLOOR_Y: f32 = 600.0;
const MAX_FRAMES: u32 = 40_000;

fn board(num_rows: u32) -> BoardLayout {
    BoardLayout::new(400.0, 40.0, 80.0, 20.0, num_rows)
}

/// Drive with an uneven but fixed frame pattern until everything settles
fn run(sim: &mut Simulation, board: &BoardLayout) -> RunResult {
    let dts = [16.0_f64, 33.0, 7.0, 16.0, 48.0];
    let mut result = RunResult::default();
    let mut t = 0.0;
    for frame in 0..MAX_FRAMES {
        let dt = dts[frame as usize % dts.len()];
        t += dt;
        sim.set_elapsed_ms(t);
        let out = sim.update(dt, board, |_| FLOOR_Y);
        result.peg_hits += out.peg_hits.len() as u32;
        for p in out.settled {
            result.settled_beats.push(p.beat_index);
            result.max_peg_index = result.max_peg_index.max(p.peg_index);
        }
        if sim.all_settled() {
            break;
        }
    }
    result
}

#[derive(Default)]
struct RunResult {
    settled_beats: Vec<u32>,
    peg_hits: u32,
    max_peg_index: u32,
}

#[test]
fn same_seed_same_run_is_bit_identical() {
    let geom = board(12);
    let mut a = Simulation::new(12, 32, 120.0, 424242);
    let mut b = Simulation::new(12, 32, 120.0, 424242);

    let ra = run(&mut a, &geom);
    let rb = run(&mut b, &geom);

    assert_eq!(a.bin_counts(), b.bin_counts());
    assert_eq!(a.emitted_count(), b.emitted_count());
    assert_eq!(ra.settled_beats, rb.settled_beats);
    assert_eq!(ra.peg_hits, rb.peg_hits);
}

#[test]
fn different_seeds_draw_different_paths() {
    // Compare the raw decision streams, not run outcomes: 64 agreeing
    // draws from two distinct PCG streams would be astronomical.
    let mut a = SeededRng::new(1);
    let mut b = SeededRng::new(2);
    let seq_a: Vec<u32> = (0..64).map(|_| a.next_unit().to_bits()).collect();
    let seq_b: Vec<u32> = (0..64).map(|_| b.next_unit().to_bits()).collect();
    assert_ne!(seq_a, seq_b);
}

#[test]
fn invariants_hold_across_presets_and_sizes() {
    let cases = [
        (4_u32, 16_u32, Preset::Standard),
        (8, 24, Preset::HeavySand),
        (8, 24, Preset::SuperBall),
        (12, 16, Preset::Techno),
        (6, 12, Preset::MoonGravity),
    ];

    for (rows, beats, preset) in cases {
        let geom = board(rows);
        let mut sim = Simulation::with_profile(
            rows,
            beats,
            240.0,
            31337,
            PhysicsProfile::preset(preset),
        );
        let result = run(&mut sim, &geom);

        assert!(sim.all_settled(), "{preset:?} rows={rows} did not settle");
        assert_eq!(sim.emitted_count(), beats, "{preset:?}");
        assert_eq!(
            sim.bin_counts().iter().sum::<u32>(),
            beats,
            "{preset:?} bin counts must sum to the budget"
        );
        // Each grain crossed each row exactly once
        assert_eq!(result.peg_hits, beats * rows, "{preset:?}");
        assert!(result.max_peg_index <= rows, "{preset:?}");

        // No grain settled twice
        let mut beats_seen = result.settled_beats.clone();
        beats_seen.sort_unstable();
        beats_seen.dedup();
        assert_eq!(beats_seen.len(), beats as usize, "{preset:?}");
    }
}

#[test]
fn rising_ground_keeps_counts_consistent() {
    let geom = board(8);
    let mut stacks = BinStacks::new(&geom, FLOOR_Y, 120.0, 64);
    let mut sim = Simulation::new(8, 64, 300.0, 77);

    let mut t = 0.0;
    for _ in 0..MAX_FRAMES {
        t += 16.0;
        sim.set_elapsed_ms(t);
        let out = sim.update(16.0, &geom, |x| stacks.ground_y(x));
        for p in &out.settled {
            stacks.record(p.bin);
        }
        // The stacks mirror the simulation's own ledger at all times
        assert_eq!(stacks.counts(), sim.bin_counts());
        if sim.all_settled() {
            break;
        }
    }
    assert!(sim.all_settled());
    assert_eq!(stacks.counts().iter().sum::<u32>(), 64);
}

#[test]
fn replayed_bin_counts_match_snap_distribution_source() {
    // instant_snap and a physical run share one RNG stream, so for the
    // same seed they must produce identical bins: physics jitter never
    // changes a grain's predetermined bin.
    let geom = board(10);

    let mut physical = Simulation::new(10, 40, 300.0, 555);
    run(&mut physical, &geom);

    let mut snapped = Simulation::new(10, 40, 300.0, 555);
    snapped.set_elapsed_ms(1e9);
    snapped.instant_snap(&geom);

    assert_eq!(physical.bin_counts(), snapped.bin_counts());
}
