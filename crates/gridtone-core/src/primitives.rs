//! Stateless signal building blocks.
//!
//! Time vectors are kept in `f64` so oscillator phase stays accurate over long
//! renders; samples are `f32`. Every function accepts a length of zero and
//! returns an empty buffer for it.

use std::f64::consts::TAU;

use rand::Rng;

/// Smallest first uniform accepted by the Box-Muller transform.
const BOX_MULLER_MIN_U1: f64 = 1e-30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// `frames` timestamps in seconds, starting at zero.
#[must_use]
pub fn time_axis(frames: usize, sample_rate: u32) -> Vec<f64> {
    let rate = f64::from(sample_rate.max(1));
    (0..frames).map(|frame| frame as f64 / rate).collect()
}

#[must_use]
pub fn sine(freq_hz: f64, t: &[f64]) -> Vec<f32> {
    t.iter().map(|&time| (TAU * freq_hz * time).sin() as f32).collect()
}

/// `exp(-t / tau)`. A non-positive `tau` decays instantly to silence.
#[must_use]
pub fn exp_decay(t: &[f64], tau: f64) -> Vec<f32> {
    if tau <= 0.0 {
        return vec![0.0; t.len()];
    }
    t.iter().map(|&time| (-time / tau).exp() as f32).collect()
}

/// Ramp over `frames` samples including both endpoints.
///
/// A single-sample ramp holds the start value.
#[must_use]
pub fn linear_fade(frames: usize, direction: FadeDirection) -> Vec<f32> {
    if frames == 0 {
        return Vec::new();
    }
    if frames == 1 {
        return vec![match direction {
            FadeDirection::In => 0.0,
            FadeDirection::Out => 1.0,
        }];
    }

    let last = (frames - 1) as f64;
    (0..frames)
        .map(|index| {
            let rising = index as f64 / last;
            match direction {
                FadeDirection::In => rising as f32,
                FadeDirection::Out => (1.0 - rising) as f32,
            }
        })
        .collect()
}

/// Symmetric Hann window whose first and last samples are zero.
#[must_use]
pub fn hann_window(frames: usize) -> Vec<f32> {
    match frames {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let last = (frames - 1) as f64;
            (0..frames)
                .map(|index| (0.5 - 0.5 * (TAU * index as f64 / last).cos()) as f32)
                .collect()
        }
    }
}

/// Uniform samples in `[-1, 1)`.
pub fn uniform_noise<R: Rng + ?Sized>(frames: usize, rng: &mut R) -> Vec<f32> {
    (0..frames)
        .map(|_| rng.random_range(-1.0_f64..1.0) as f32)
        .collect()
}

/// Standard normal samples.
pub fn normal_noise<R: Rng + ?Sized>(frames: usize, rng: &mut R) -> Vec<f32> {
    (0..frames).map(|_| standard_normal(rng) as f32).collect()
}

pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u1: f64 = rng.random();
        let u2: f64 = rng.random();
        if u1 > BOX_MULLER_MIN_U1 {
            let radius = (-2.0 * u1.ln()).sqrt();
            return radius * (TAU * u2).cos();
        }
    }
}

/// `tanh(x * drive)`.
#[must_use]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh()
}

#[must_use]
pub fn hard_clip(sample: f32) -> f32 {
    sample.clamp(-1.0, 1.0)
}

/// Sign that maps zero to zero.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Adds `source` into `dest` starting at `offset`, dropping whatever would run past the end.
pub fn add_at(dest: &mut [f32], source: &[f32], offset: usize) {
    let Some(window) = dest.get_mut(offset..) else {
        return;
    };
    for (out, sample) in window.iter_mut().zip(source) {
        *out += *sample;
    }
}

/// Elementwise product, truncated to the shorter input.
#[must_use]
pub fn multiply(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(left, right)| left * right).collect()
}
