//! Galton Tempo headless runner
//!
//! Drives a full run without a renderer: the beat clock is sampled on a
//! synthetic 60 fps frame step, elapsed time is injected into the
//! simulation, and settled grains raise the bin stacks exactly as the
//! canvas layer would. Prints the final histogram and a JSON summary.
//!
//! Usage: galton-tempo "bpm=120&bars=8&rows=16&s=42&mode=standard"

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use galton_tempo::consts::BEATS_PER_BAR;
use galton_tempo::{BeatClock, BinStacks, BoardLayout, SimConfig, Simulation};

/// Frame step for the synthetic render loop, ms
const FRAME_MS: u64 = 16;

/// Board metrics for the headless run (pixel-ish units; any consistent
/// scale works, the simulation only sees the geometry contract)
const EMIT_X: f32 = 400.0;
const EMIT_Y: f32 = 60.0;
const BOARD_TOP: f32 = 120.0;
const PEG_SPACING: f32 = 20.0;
const FLOOR_Y: f32 = 680.0;
const ACC_HEIGHT: f32 = 140.0;

fn main() {
    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_default();
    let mut cfg = SimConfig::from_query(&query);
    if cfg.seed == 0 {
        // No seed requested: derive one from wall time, forced odd
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        cfg.seed = (millis % 1_000_000) as u32 | 1;
    }
    log::info!("run config: {}", cfg.to_query());

    let mut sim = Simulation::from_config(&cfg);
    let board = BoardLayout::new(EMIT_X, EMIT_Y, BOARD_TOP, PEG_SPACING, cfg.rows);
    let mut stacks = BinStacks::new(&board, FLOOR_Y, ACC_HEIGHT, sim.total_particles());

    let mut clock = BeatClock::new();
    let t0 = Instant::now();
    clock.start_at(sim.total_time_ms(), t0);

    let mut frame_ms = 0u64;
    let mut last_bar = u32::MAX;
    let mut peg_hit_total = 0usize;

    // Generous frame budget: the run itself plus settling tail
    let max_frames = sim.total_time_ms() as u64 / FRAME_MS + 600_000;

    for _ in 0..max_frames {
        frame_ms += FRAME_MS;
        let tick = clock.sample_at(t0 + Duration::from_millis(frame_ms));
        sim.set_elapsed_ms(tick.elapsed_ms);

        let out = sim.update(FRAME_MS as f64, &board, |x| stacks.ground_y(x));
        peg_hit_total += out.peg_hits.len();
        for p in &out.settled {
            stacks.record(p.bin);
        }

        let bar = sim.current_bar(BEATS_PER_BAR);
        if bar != last_bar {
            log::debug!(
                "bar {}/{} - beat {} - {} in flight",
                bar + 1,
                cfg.bars,
                sim.current_beat(),
                sim.active().len()
            );
            last_bar = bar;
        }

        if tick.done && sim.all_settled() {
            break;
        }
    }

    log::info!(
        "settled {}/{} grains, {} peg hits",
        sim.bin_counts().iter().sum::<u32>(),
        sim.total_particles(),
        peg_hit_total
    );

    print_histogram(sim.bin_counts());

    let summary = serde_json::json!({
        "config": cfg,
        "total_beats": sim.total_particles(),
        "emitted": sim.emitted_count(),
        "bin_counts": sim.bin_counts(),
        "peg_hits": peg_hit_total,
        "all_settled": sim.all_settled(),
    });
    println!("{summary}");
}

fn print_histogram(bin_counts: &[u32]) {
    let peak = bin_counts.iter().copied().max().unwrap_or(0).max(1);
    for (bin, &count) in bin_counts.iter().enumerate() {
        let width = (count as usize * 50) / peak as usize;
        eprintln!("bin {bin:>2} | {:<50} {count}", "#".repeat(width));
    }
}
