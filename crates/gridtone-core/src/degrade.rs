//! Seed-loop synthesis and the probabilistic degradation chain.
//!
//! `scar` is the cell's progress in `[0, 1]`: later cells get shorter loops,
//! more passes and higher trigger probabilities.

use rand::Rng;
use tracing::trace;

use crate::{
    primitives::{hann_window, normal_noise, sine, time_axis},
    seed::SignalRng,
};

pub const MIN_LOOP_FRAMES: usize = 128;
const LOOP_MIN_SECONDS: f64 = 0.02;
const LOOP_SPAN_SECONDS: f64 = 0.08;
const LOOP_BASE_HZ: f64 = 110.0;
const LOOP_SWEEP_HZ: f64 = 180.0;
const LOOP_TONE_GAIN: f32 = 0.18;
const LOOP_NOISE_GAIN: f32 = 0.10;

/// Loop length in frames, shrinking linearly as `scar` grows.
#[must_use]
pub fn loop_length(sample_rate: u32, scar: f64) -> usize {
    let seconds = LOOP_MIN_SECONDS + LOOP_SPAN_SECONDS * (1.0 - scar);
    let frames = (f64::from(sample_rate) * seconds).max(0.0) as usize;
    frames.max(MIN_LOOP_FRAMES)
}

/// Sine plus normal noise under a Hann window, so the loop can be tiled without clicks.
pub fn synthesize_seed_loop(sample_rate: u32, scar: f64, rng: &mut SignalRng) -> Vec<f32> {
    let frames = loop_length(sample_rate, scar);
    let t = time_axis(frames, sample_rate);
    let tone = sine(LOOP_BASE_HZ + scar * LOOP_SWEEP_HZ, &t);
    let noise = normal_noise(frames, rng);
    let window = hann_window(frames);

    tone.iter()
        .zip(&noise)
        .zip(&window)
        .map(|((tone, noise), window)| (LOOP_TONE_GAIN * tone + LOOP_NOISE_GAIN * noise) * window)
        .collect()
}

/// One destructive transform in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// Rounds to `2^bits - 1` levels; fewer bits as `scar` grows.
    Quantize,
    /// Zeroes a random span of 10–50% of the loop.
    SegmentMute,
    /// Adds a small constant offset scaled by `scar`.
    DcJitter,
}

/// Application order within one pass.
pub const DEGRADATION_ORDER: [Degradation; 3] = [
    Degradation::Quantize,
    Degradation::SegmentMute,
    Degradation::DcJitter,
];

impl Degradation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Quantize => "quantize",
            Self::SegmentMute => "segment_mute",
            Self::DcJitter => "dc_jitter",
        }
    }

    #[must_use]
    pub fn probability(self, scar: f64) -> f64 {
        match self {
            Self::Quantize => 0.25 + 0.5 * scar,
            Self::SegmentMute => 0.15 + 0.55 * scar,
            Self::DcJitter => 0.10 + 0.30 * scar,
        }
    }

    pub fn apply(self, samples: &mut [f32], rng: &mut SignalRng, scar: f64) {
        match self {
            Self::Quantize => quantize(samples, quantize_bits(scar)),
            Self::SegmentMute => mute_random_segment(samples, rng),
            Self::DcJitter => {
                let offset = (rng.random_range(-0.01_f64..0.01) * scar) as f32;
                for sample in samples {
                    *sample += offset;
                }
            }
        }
    }
}

#[must_use]
pub fn quantize_bits(scar: f64) -> u32 {
    let bits = (7.0 - scar * 4.0) as i64;
    bits.clamp(2, 8) as u32
}

/// Rounds to `2^bits - 1` levels, ties to even.
pub fn quantize(samples: &mut [f32], bits: u32) {
    let levels = ((1_u32 << bits) - 1) as f32;
    for sample in samples {
        *sample = (*sample * levels).round_ties_even() / levels;
    }
}

fn mute_random_segment(samples: &mut [f32], rng: &mut SignalRng) {
    let len = samples.len();
    if len == 0 {
        return;
    }

    let start = rng.random_range(0..len);
    let (shortest, longest) = (len / 10, len / 2);
    let span = if shortest < longest {
        rng.random_range(shortest..longest)
    } else {
        shortest
    };
    let end = len.min(start + span);
    samples[start..end].fill(0.0);
}

#[must_use]
pub fn pass_count(scar: f64) -> usize {
    (1.0 + scar * 6.0) as usize
}

/// Runs `pass_count(scar)` passes over a copy of `seed_loop`, re-rolling every trigger each pass.
pub fn degrade(seed_loop: &[f32], rng: &mut SignalRng, scar: f64) -> Vec<f32> {
    let mut working = seed_loop.to_vec();
    for pass in 0..pass_count(scar) {
        for step in DEGRADATION_ORDER {
            if rng.random::<f64>() < step.probability(scar) {
                step.apply(&mut working, rng, scar);
                trace!(pass, transform = step.name(), "degradation applied");
            }
        }
    }
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::create_rng;

    #[test]
    fn loop_shrinks_as_scar_grows() {
        assert_eq!(loop_length(44_100, 0.0), 4_410);
        assert_eq!(loop_length(44_100, 1.0), 882);
        assert!(loop_length(44_100, 1.0) < loop_length(44_100, 0.0));
        assert_eq!(loop_length(1_000, 1.0), MIN_LOOP_FRAMES);
    }

    #[test]
    fn seed_loop_is_windowed_to_silence_at_its_edges() {
        let mut rng = create_rng(1_337);
        let seed_loop = synthesize_seed_loop(44_100, 0.5, &mut rng);
        assert_eq!(seed_loop.len(), loop_length(44_100, 0.5));
        assert!(seed_loop[0].abs() < 1e-6);
        assert!(seed_loop[seed_loop.len() - 1].abs() < 1e-6);
    }

    #[test]
    fn bit_depth_falls_with_scar() {
        assert_eq!(quantize_bits(0.0), 7);
        assert_eq!(quantize_bits(0.5), 5);
        assert_eq!(quantize_bits(1.0), 3);
    }

    #[test]
    fn quantize_snaps_to_levels() {
        let mut samples = vec![0.0, 0.1, 0.5, -0.9];
        quantize(&mut samples, 2);
        for sample in &samples {
            let scaled = sample * 3.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn pass_count_grows_with_scar() {
        assert_eq!(pass_count(0.0), 1);
        assert_eq!(pass_count(0.5), 4);
        assert_eq!(pass_count(1.0), 7);
    }

    #[test]
    fn probabilities_rise_with_scar() {
        for step in DEGRADATION_ORDER {
            assert!(step.probability(1.0) > step.probability(0.0));
            assert!(step.probability(1.0) <= 1.0);
        }
    }

    #[test]
    fn segment_mute_zeroes_one_contiguous_span() {
        let mut rng = create_rng(5);
        let mut samples = vec![1.0_f32; 1_000];
        Degradation::SegmentMute.apply(&mut samples, &mut rng, 1.0);

        let first = samples.iter().position(|sample| *sample == 0.0);
        let last = samples.iter().rposition(|sample| *sample == 0.0);
        let (Some(first), Some(last)) = (first, last) else {
            panic!("segment mute should silence at least one sample");
        };
        assert!(samples[first..=last].iter().all(|sample| *sample == 0.0));
        assert!(last - first < 500);
    }

    #[test]
    fn dc_jitter_is_inert_at_zero_scar() {
        let mut rng = create_rng(9);
        let mut samples = vec![0.25_f32; 16];
        Degradation::DcJitter.apply(&mut samples, &mut rng, 0.0);
        assert!(samples.iter().all(|sample| *sample == 0.25));
    }

    #[test]
    fn degrade_is_reproducible() {
        let seed_loop = synthesize_seed_loop(22_050, 0.8, &mut create_rng(3));
        let a = degrade(&seed_loop, &mut create_rng(4), 0.8);
        let b = degrade(&seed_loop, &mut create_rng(4), 0.8);
        assert_eq!(a, b);
        assert_eq!(a.len(), seed_loop.len());
    }
}
