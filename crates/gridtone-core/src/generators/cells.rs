//! Position-dependent generators: output degrades as the cell moves through its grid.

use tracing::debug;

use super::Timeline;
use crate::{
    buffer::{finish_cell, tile_loop},
    degrade::{degrade, pass_count, synthesize_seed_loop},
    fragment::{FragmentMode, event_count, scatter_events, synthesize_bed},
    seed::SignalRng,
};

pub const CELL_LOOP_DRIVE: f32 = 1.3;
pub const CELL_LOOP_GAIN: f32 = 0.8;
pub const SKIP_DENSITY_DRIVE: f32 = 1.6;
pub const SKIP_DENSITY_GAIN: f32 = 0.85;

/// Seed loop, degraded by progress, tiled across the render.
pub(super) fn cellwise_degrade_loop(
    timeline: &Timeline,
    progress: f64,
    rng: &mut SignalRng,
) -> Vec<f32> {
    let seed_loop = synthesize_seed_loop(timeline.sample_rate, progress, rng);
    let degraded = degrade(&seed_loop, rng, progress);
    let mut output = tile_loop(&degraded, timeline.frames);
    finish_cell(
        &mut output,
        timeline.sample_rate,
        CELL_LOOP_DRIVE,
        CELL_LOOP_GAIN,
    );

    debug!(
        loop_frames = seed_loop.len(),
        passes = pass_count(progress),
        progress,
        "degrade loop assembled"
    );
    output
}

/// Dual-sine bed broken up by repeat, decimate or dropout events.
pub(super) fn skip_density(timeline: &Timeline, progress: f64, rng: &mut SignalRng) -> Vec<f32> {
    let mut output = synthesize_bed(timeline.sample_rate, timeline.frames, progress);
    scatter_events(&mut output, timeline.sample_rate, progress, rng);
    finish_cell(
        &mut output,
        timeline.sample_rate,
        SKIP_DENSITY_DRIVE,
        SKIP_DENSITY_GAIN,
    );

    debug!(
        events = event_count(progress),
        mode = FragmentMode::for_progress(progress).name(),
        progress,
        "skip density assembled"
    );
    output
}
