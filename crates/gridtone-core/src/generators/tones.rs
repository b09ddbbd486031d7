//! Single-shot tone, click and burst generators.

use std::f64::consts::TAU;

use rand::Rng;

use super::Timeline;
use crate::{
    primitives::{FadeDirection, add_at, linear_fade, multiply, sign, sine as sine_wave, uniform_noise},
    seed::SignalRng,
};

const SINE_HZ: f64 = 220.0;
const SINE_GAIN: f32 = 0.2;

const CLICKS_PER_SECOND: f64 = 8.0;
const CLICK_SECONDS: f64 = 0.002;
const CLICK_GAIN: f32 = 0.9;

const TICK_EVERY_SECONDS: f64 = 0.125;
const TICK_SECONDS: f64 = 0.01;
const TICK_HZ: f64 = 900.0;
const TICK_GAIN: f32 = 0.6;

const PULSE_TONE_HZ: f64 = 220.0;
const PULSE_GATE_HZ: f64 = 5.5;
const PULSE_BUZZ_HZ: f64 = 60.0;
const PULSE_TONE_GAIN: f64 = 0.4;
const PULSE_BUZZ_GAIN: f64 = 0.1;

const BURSTS_PER_SECOND: f64 = 6.0;
const BURST_SECONDS: f64 = 0.015;
const BURST_GAIN: f32 = 0.4;

pub(super) fn sine(timeline: &Timeline) -> Vec<f32> {
    sine_wave(SINE_HZ, &timeline.time_axis())
        .into_iter()
        .map(|sample| sample * SINE_GAIN)
        .collect()
}

/// Short linear-decay clicks at a fixed rate.
pub(super) fn click_train(timeline: &Timeline) -> Vec<f32> {
    let frames = timeline.frames;
    let spacing = timeline.frames_at_least_one(1.0 / CLICKS_PER_SECOND);
    let click_frames = timeline.frames_at_least_one(CLICK_SECONDS);

    let mut output = vec![0.0_f32; frames];
    for start in (0..frames).step_by(spacing) {
        let len = click_frames.min(frames - start);
        let click: Vec<f32> = linear_fade(len, FadeDirection::Out)
            .into_iter()
            .map(|env| env * CLICK_GAIN)
            .collect();
        add_at(&mut output, &click, start);
    }
    output
}

/// A short decaying 900 Hz blip every eighth of a second.
pub(super) fn sine_ticks(timeline: &Timeline) -> Vec<f32> {
    let frames = timeline.frames;
    let spacing = timeline.frames_at_least_one(TICK_EVERY_SECONDS);
    let tick_frames = timeline.frames_at_least_one(TICK_SECONDS);

    let mut output = vec![0.0_f32; frames];
    for start in (0..frames).step_by(spacing) {
        let len = tick_frames.min(frames - start);
        let local = Timeline {
            frames: len,
            ..*timeline
        };
        let tone = sine_wave(TICK_HZ, &local.time_axis());
        let env = linear_fade(len, FadeDirection::Out);
        let tick: Vec<f32> = multiply(&tone, &env)
            .into_iter()
            .map(|sample| sample * TICK_GAIN)
            .collect();
        add_at(&mut output, &tick, start);
    }
    output
}

/// A tone plus square buzz, switched on during the positive half of a slow gate.
pub(super) fn glitch_pulses(timeline: &Timeline) -> Vec<f32> {
    timeline
        .time_axis()
        .into_iter()
        .map(|time| {
            let gate = (TAU * PULSE_GATE_HZ * time).sin() > 0.0;
            if !gate {
                return 0.0;
            }
            let tone = (TAU * PULSE_TONE_HZ * time).sin() * PULSE_TONE_GAIN;
            let buzz = sign((TAU * PULSE_BUZZ_HZ * time).sin()) * PULSE_BUZZ_GAIN;
            (tone + buzz) as f32
        })
        .collect()
}

/// Short decaying noise bursts scattered at random.
pub(super) fn sparse_noise(timeline: &Timeline, rng: &mut SignalRng) -> Vec<f32> {
    let frames = timeline.frames;
    let bursts = ((timeline.duration_seconds * BURSTS_PER_SECOND) as usize).max(1);
    let burst_frames = timeline.frames_at_least_one(BURST_SECONDS);

    let mut output = vec![0.0_f32; frames];
    for _ in 0..bursts {
        let latest = frames.saturating_sub(burst_frames).max(1);
        let start = rng.random_range(0..latest);
        let len = burst_frames.min(frames - start);
        let noise = uniform_noise(len, rng);
        let env = linear_fade(len, FadeDirection::Out);
        let burst: Vec<f32> = multiply(&noise, &env)
            .into_iter()
            .map(|sample| sample * BURST_GAIN)
            .collect();
        add_at(&mut output, &burst, start);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::create_rng;

    fn timeline(sample_rate: u32, duration_seconds: f64) -> Timeline {
        Timeline {
            sample_rate,
            frames: crate::time::sample_count(sample_rate, duration_seconds),
            duration_seconds,
        }
    }

    #[test]
    fn clicks_start_at_full_level_on_the_grid() {
        let output = click_train(&timeline(8_000, 1.0));
        for start in (0..8_000).step_by(1_000) {
            assert!((output[start] - CLICK_GAIN).abs() < 1e-6);
        }
        assert_eq!(output[500], 0.0);
    }

    #[test]
    fn ticks_are_silent_between_blips() {
        let output = sine_ticks(&timeline(8_000, 0.5));
        assert!(output[100..1_000].iter().all(|sample| *sample == 0.0));
        assert!(output[1_001..1_080].iter().any(|sample| *sample != 0.0));
    }

    #[test]
    fn pulses_are_gated() {
        let output = glitch_pulses(&timeline(8_000, 1.0));
        // The gate is closed for the second half of each 5.5 Hz cycle.
        assert!(output[800..1_400].iter().all(|sample| *sample == 0.0));
        assert!(output[10..700].iter().any(|sample| *sample != 0.0));
    }

    #[test]
    fn sparse_noise_has_at_least_one_burst() {
        let mut rng = create_rng(7);
        let output = sparse_noise(&timeline(8_000, 0.1), &mut rng);
        assert!(output.iter().any(|sample| *sample != 0.0));
        assert!(output.iter().all(|sample| sample.abs() <= BURST_GAIN));
    }
}
