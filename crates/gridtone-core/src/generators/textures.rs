//! Slow-moving ambient textures: saturated partials, hiss and bursts under an LFO.

use std::f64::consts::TAU;

use rand::Rng;

use super::Timeline;
use crate::{
    buffer::{apply_edge_fade, soft_clip_gain},
    primitives::{FadeDirection, linear_fade, sine, uniform_noise},
    seed::SignalRng,
    time::sample_count,
};

/// Fraction of the whole render used for the pad/haze edge fades.
const TEXTURE_FADE_FRACTION: f64 = 0.05;

fn texture_fade_frames(frames: usize) -> usize {
    ((TEXTURE_FADE_FRACTION * frames as f64) as usize).max(1)
}

fn lfo(time: f64, rate_hz: f64, center: f64, depth: f64) -> f64 {
    center + depth * (TAU * rate_hz * time).sin()
}

/// A low drone with hiss, pierced by short decaying tone bursts.
pub(super) fn glitch_wash(timeline: &Timeline, rng: &mut SignalRng) -> Vec<f32> {
    let frames = timeline.frames;
    let t = timeline.time_axis();
    let noise = uniform_noise(frames, rng);
    let mut output: Vec<f32> = sine(90.0, &t)
        .iter()
        .zip(&noise)
        .map(|(tone, noise)| tone * 0.15 + noise * 0.06)
        .collect();

    let bursts = ((timeline.duration_seconds * 10.0) as usize).max(1);
    let shortest = sample_count(timeline.sample_rate, 0.01);
    let longest = sample_count(timeline.sample_rate, 0.04);
    for _ in 0..bursts {
        let start = rng.random_range(0..frames.saturating_sub(1).max(1));
        let length = if shortest < longest {
            rng.random_range(shortest..longest)
        } else {
            shortest
        };
        let end = frames.min(start + length);
        let env = linear_fade(end - start, FadeDirection::Out);
        let freq = rng.random_range(200.0..1_200.0);
        let tone = sine(freq, &t[..end - start]);
        for ((sample, tone), env) in output[start..end].iter_mut().zip(&tone).zip(&env) {
            *sample += tone * env * 0.4;
        }
    }

    for (sample, &time) in output.iter_mut().zip(&t) {
        *sample *= lfo(time, 0.12, 0.6, 0.4) as f32;
    }
    soft_clip_gain(&mut output, 1.4, 1.0);
    output
}

/// Five slightly detuned harmonics breathing under a very slow LFO.
pub(super) fn shimmer_pad(timeline: &Timeline, rng: &mut SignalRng) -> Vec<f32> {
    const PARTIALS_HZ: [f64; 5] = [110.0, 220.0, 330.0, 440.0, 660.0];

    let t = timeline.time_axis();
    let mut output = vec![0.0_f32; timeline.frames];
    for (index, freq) in PARTIALS_HZ.iter().enumerate() {
        let detune = 1.0 + (index as f64 - 2.0) * 0.0025;
        let weight = 0.18 / (1.0 + index as f32);
        for (sample, partial) in output.iter_mut().zip(sine(freq * detune, &t)) {
            *sample += partial * weight;
        }
    }

    let noise = uniform_noise(timeline.frames, rng);
    for ((sample, &time), noise) in output.iter_mut().zip(&t).zip(&noise) {
        *sample = *sample * lfo(time, 0.08, 0.5, 0.5) as f32 + noise * 0.02;
    }

    apply_edge_fade(&mut output, texture_fade_frames(timeline.frames));
    soft_clip_gain(&mut output, 1.2, 1.0);
    output
}

/// Three partials with a slight tape wobble, hiss and a long swell.
pub(super) fn tape_haze(timeline: &Timeline, rng: &mut SignalRng) -> Vec<f32> {
    const PARTIALS: [(f64, f64); 3] = [(140.0, 0.12), (280.0, 0.08), (420.0, 0.05)];

    let t = timeline.time_axis();
    let hiss = uniform_noise(timeline.frames, rng);
    let mut output: Vec<f32> = t
        .iter()
        .zip(&hiss)
        .map(|(&time, hiss)| {
            let wobble = lfo(time, 0.4, 1.0, 0.003);
            let tones: f64 = PARTIALS
                .iter()
                .map(|(freq, gain)| (TAU * freq * wobble * time).sin() * gain)
                .sum();
            (tones as f32 + hiss * 0.03) * lfo(time, 0.03, 0.5, 0.5) as f32
        })
        .collect();

    apply_edge_fade(&mut output, texture_fade_frames(timeline.frames));
    soft_clip_gain(&mut output, 1.3, 1.0);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::create_rng;

    fn timeline(frames: usize) -> Timeline {
        Timeline {
            sample_rate: 8_000,
            frames,
            duration_seconds: frames as f64 / 8_000.0,
        }
    }

    #[test]
    fn fade_length_is_five_percent_with_a_floor() {
        assert_eq!(texture_fade_frames(1_000), 50);
        assert_eq!(texture_fade_frames(3), 1);
    }

    #[test]
    fn pads_open_and_close_on_silence() {
        let pad = shimmer_pad(&timeline(8_000), &mut create_rng(330));
        assert_eq!(pad[0], 0.0);
        assert_eq!(pad[pad.len() - 1], 0.0);

        let haze = tape_haze(&timeline(8_000), &mut create_rng(140));
        assert_eq!(haze[0], 0.0);
        assert_eq!(haze[haze.len() - 1], 0.0);
    }

    #[test]
    fn textures_stay_inside_the_soft_clip() {
        let wash = glitch_wash(&timeline(16_000), &mut create_rng(12));
        assert_eq!(wash.len(), 16_000);
        assert!(wash.iter().all(|sample| sample.abs() < 1.0));
    }

    #[test]
    fn one_sample_renders_do_not_panic() {
        let mut rng = create_rng(1);
        assert_eq!(glitch_wash(&timeline(1), &mut rng).len(), 1);
        assert_eq!(shimmer_pad(&timeline(1), &mut rng), vec![0.0]);
        assert_eq!(tape_haze(&timeline(1), &mut rng), vec![0.0]);
    }
}
