//! Local fragment events over a continuous two-oscillator bed.

use rand::Rng;
use tracing::trace;

use crate::{
    primitives::{sine, time_axis},
    seed::SignalRng,
};

const BED_LOW_HZ: f64 = 140.0;
const BED_LOW_SWEEP_HZ: f64 = 120.0;
const BED_HIGH_HZ: f64 = 430.0;
const BED_HIGH_SWEEP_HZ: f64 = 350.0;
const BED_LOW_GAIN: f32 = 0.10;
const BED_HIGH_GAIN: f32 = 0.06;

const EVENT_MIN_SECONDS: f64 = 0.004;
const EVENT_MAX_SECONDS: f64 = 0.06;
pub const MIN_EVENT_FRAMES: usize = 16;

/// Two sines whose frequencies rise linearly with `progress`.
#[must_use]
pub fn synthesize_bed(sample_rate: u32, frames: usize, progress: f64) -> Vec<f32> {
    let t = time_axis(frames, sample_rate);
    let low = sine(BED_LOW_HZ + BED_LOW_SWEEP_HZ * progress, &t);
    let high = sine(BED_HIGH_HZ + BED_HIGH_SWEEP_HZ * progress, &t);
    low.iter()
        .zip(&high)
        .map(|(low, high)| BED_LOW_GAIN * low + BED_HIGH_GAIN * high)
        .collect()
}

#[must_use]
pub fn event_count(progress: f64) -> usize {
    (2.0 + 12.0 * progress) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentMode {
    /// Copies the captured span forward 2–3 times.
    MicroRepeat,
    /// Keeps every Nth sample (N in 4..32) and holds it.
    Decimate,
    /// Zeroes the span.
    Dropout,
}

impl FragmentMode {
    #[must_use]
    pub fn for_progress(progress: f64) -> Self {
        if progress < 0.33 {
            Self::MicroRepeat
        } else if progress < 0.66 {
            Self::Decimate
        } else {
            Self::Dropout
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MicroRepeat => "micro_repeat",
            Self::Decimate => "decimate",
            Self::Dropout => "dropout",
        }
    }

    /// Mutates `samples[start..start + len]`, clipped to the buffer end.
    pub fn apply(self, samples: &mut [f32], start: usize, len: usize, rng: &mut SignalRng) {
        let total = samples.len();
        if start >= total || len == 0 {
            return;
        }
        let end = total.min(start + len);

        match self {
            Self::MicroRepeat => {
                let fragment = samples[start..end].to_vec();
                let repeats = rng.random_range(2..4_usize);
                for repeat in 0..repeats {
                    let from = start + repeat * len;
                    let to = total.min(from + len);
                    if to <= from {
                        continue;
                    }
                    let copied = (to - from).min(fragment.len());
                    samples[from..from + copied].copy_from_slice(&fragment[..copied]);
                }
            }
            Self::Decimate => {
                let factor = rng.random_range(4..32_usize);
                let held = hold_decimated(&samples[start..end], factor, len);
                // A held fragment shorter than the span leaves the tail untouched.
                let written = held.len().min(end - start);
                samples[start..start + written].copy_from_slice(&held[..written]);
            }
            Self::Dropout => samples[start..end].fill(0.0),
        }
    }
}

/// Every `factor`-th sample of `fragment`, each repeated `factor` times, cut to `limit`.
#[must_use]
pub fn hold_decimated(fragment: &[f32], factor: usize, limit: usize) -> Vec<f32> {
    let factor = factor.max(1);
    fragment
        .iter()
        .step_by(factor)
        .flat_map(|sample| std::iter::repeat_n(*sample, factor))
        .take(limit)
        .collect()
}

/// Applies `event_count(progress)` events in sequence; later events may overwrite earlier ones.
pub fn scatter_events(samples: &mut [f32], sample_rate: u32, progress: f64, rng: &mut SignalRng) {
    let total = samples.len();
    if total == 0 {
        return;
    }

    let mode = FragmentMode::for_progress(progress);
    for event in 0..event_count(progress) {
        let start = rng.random_range(0..total);
        let seconds = rng.random_range(EVENT_MIN_SECONDS..EVENT_MAX_SECONDS);
        let requested = (seconds * f64::from(sample_rate)) as usize;
        let len = requested.min(total - start).max(MIN_EVENT_FRAMES);

        mode.apply(samples, start, len, rng);
        trace!(event, start, len, mode = mode.name(), "fragment event applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::create_rng;

    #[test]
    fn mode_follows_progress_bands() {
        assert_eq!(FragmentMode::for_progress(0.0), FragmentMode::MicroRepeat);
        assert_eq!(FragmentMode::for_progress(0.32), FragmentMode::MicroRepeat);
        assert_eq!(FragmentMode::for_progress(0.33), FragmentMode::Decimate);
        assert_eq!(FragmentMode::for_progress(0.65), FragmentMode::Decimate);
        assert_eq!(FragmentMode::for_progress(0.66), FragmentMode::Dropout);
        assert_eq!(FragmentMode::for_progress(1.0), FragmentMode::Dropout);
    }

    #[test]
    fn event_count_grows_with_progress() {
        assert_eq!(event_count(0.0), 2);
        assert_eq!(event_count(0.5), 8);
        assert_eq!(event_count(1.0), 14);
    }

    #[test]
    fn hold_decimated_repeats_every_nth_sample() {
        let fragment: Vec<f32> = (0..10).map(|value| value as f32).collect();
        let held = hold_decimated(&fragment, 4, 10);
        assert_eq!(held, vec![0.0, 0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 8.0, 8.0]);
    }

    #[test]
    fn dropout_silences_the_span_only() {
        let mut rng = create_rng(1);
        let mut samples = vec![1.0_f32; 32];
        FragmentMode::Dropout.apply(&mut samples, 8, 8, &mut rng);
        assert!(samples[..8].iter().all(|sample| *sample == 1.0));
        assert!(samples[8..16].iter().all(|sample| *sample == 0.0));
        assert!(samples[16..].iter().all(|sample| *sample == 1.0));
    }

    #[test]
    fn spans_past_the_end_are_clipped() {
        let mut rng = create_rng(2);
        let mut samples: Vec<f32> = (0..20).map(|value| value as f32).collect();
        FragmentMode::Dropout.apply(&mut samples, 15, 16, &mut rng);
        assert!(samples[15..].iter().all(|sample| *sample == 0.0));

        let mut samples: Vec<f32> = (0..20).map(|value| value as f32).collect();
        FragmentMode::Decimate.apply(&mut samples, 18, 16, &mut rng);
        assert_eq!(samples.len(), 20);
        assert_eq!(samples[19], 18.0);
    }

    #[test]
    fn micro_repeat_copies_the_fragment_forward() {
        let mut rng = create_rng(3);
        let mut samples: Vec<f32> = (0..40).map(|value| value as f32).collect();
        FragmentMode::MicroRepeat.apply(&mut samples, 4, 4, &mut rng);
        assert_eq!(&samples[8..12], &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn bed_starts_at_zero_phase() {
        let bed = synthesize_bed(44_100, 64, 0.0);
        assert_eq!(bed.len(), 64);
        assert!(bed[0].abs() < 1e-7);
        assert!(bed.iter().all(|sample| sample.abs() <= 0.16 + 1e-6));
    }

    #[test]
    fn scatter_keeps_buffer_length() {
        let mut rng = create_rng(4);
        let mut samples = synthesize_bed(8_000, 4_000, 0.9);
        scatter_events(&mut samples, 8_000, 0.9, &mut rng);
        assert_eq!(samples.len(), 4_000);
    }
}
