use serde::{Deserialize, Serialize};

use crate::primitives::{FadeDirection, hard_clip, linear_fade, soft_clip};

/// Fraction of the sample rate used for the edge fades of the cell generators.
pub const EDGE_FADE_SECONDS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    #[must_use]
    pub fn channel_count(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mono => "mono",
            Self::Stereo => "stereo",
        }
    }
}

/// A finished render, stored channel-major.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    Mono(Vec<f32>),
    Stereo { left: Vec<f32>, right: Vec<f32> },
}

impl AudioBuffer {
    #[must_use]
    pub fn empty(layout: ChannelLayout) -> Self {
        match layout {
            ChannelLayout::Mono => Self::Mono(Vec::new()),
            ChannelLayout::Stereo => Self::Stereo {
                left: Vec::new(),
                right: Vec::new(),
            },
        }
    }

    /// Stereo buffer carrying the same signal on both channels.
    #[must_use]
    pub fn from_mono_duplicated(samples: Vec<f32>) -> Self {
        Self::Stereo {
            left: samples.clone(),
            right: samples,
        }
    }

    #[must_use]
    pub fn layout(&self) -> ChannelLayout {
        match self {
            Self::Mono(_) => ChannelLayout::Mono,
            Self::Stereo { .. } => ChannelLayout::Stereo,
        }
    }

    #[must_use]
    pub fn channel_count(&self) -> u16 {
        self.layout().channel_count()
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        match self {
            Self::Mono(samples) => samples.len(),
            Self::Stereo { left, .. } => left.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        match (self, index) {
            (Self::Mono(samples), 0) => Some(samples),
            (Self::Stereo { left, .. }, 0) => Some(left),
            (Self::Stereo { right, .. }, 1) => Some(right),
            _ => None,
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        let (first, second): (&[f32], &[f32]) = match self {
            Self::Mono(samples) => (samples.as_slice(), &[][..]),
            Self::Stereo { left, right } => (left.as_slice(), right.as_slice()),
        };
        first.iter().chain(second).copied()
    }

    /// Frame-interleaved samples, ready for encoding.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f32> {
        match self {
            Self::Mono(samples) => samples.clone(),
            Self::Stereo { left, right } => left
                .iter()
                .zip(right)
                .flat_map(|(l, r)| [*l, *r])
                .collect(),
        }
    }

    /// Hard-clamps every sample into `[-1, 1]`.
    pub fn clamp_unit(&mut self) {
        match self {
            Self::Mono(samples) => hard_clip_in_place(samples),
            Self::Stereo { left, right } => {
                hard_clip_in_place(left);
                hard_clip_in_place(right);
            }
        }
    }
}

/// Repeats `fragment` end to end until `frames` samples are filled, cutting the last copy short.
#[must_use]
pub fn tile_loop(fragment: &[f32], frames: usize) -> Vec<f32> {
    if fragment.is_empty() {
        return vec![0.0; frames];
    }
    fragment.iter().copied().cycle().take(frames).collect()
}

pub fn hard_clip_in_place(samples: &mut [f32]) {
    for sample in samples {
        *sample = hard_clip(*sample);
    }
}

/// `tanh(x * drive) * gain` over the whole buffer.
pub fn soft_clip_gain(samples: &mut [f32], drive: f32, gain: f32) {
    for sample in samples {
        *sample = soft_clip(*sample, drive) * gain;
    }
}

/// Ramps the first `fade_frames` samples up from zero and the last `fade_frames` down to zero.
///
/// `fade_frames` is capped at the buffer length.
pub fn apply_edge_fade(samples: &mut [f32], fade_frames: usize) {
    let fade_frames = fade_frames.min(samples.len());
    if fade_frames == 0 {
        return;
    }

    let ramp = linear_fade(fade_frames, FadeDirection::In);
    for (sample, gain) in samples.iter_mut().zip(&ramp) {
        *sample *= gain;
    }

    let tail_start = samples.len() - fade_frames;
    for (sample, gain) in samples[tail_start..].iter_mut().zip(ramp.iter().rev()) {
        *sample *= gain;
    }
}

/// Edge fade length for the cell generators: ~1% of a second, never more than half the buffer.
#[must_use]
pub fn edge_fade_frames(sample_rate: u32, frames: usize) -> usize {
    let fade = (EDGE_FADE_SECONDS * f64::from(sample_rate)) as usize;
    fade.min(frames / 2)
}

/// Soft clip then edge fades, as every cell generator ends.
///
/// Fades shorter than two samples are skipped.
pub fn finish_cell(samples: &mut [f32], sample_rate: u32, drive: f32, gain: f32) {
    soft_clip_gain(samples, drive, gain);
    let fade = edge_fade_frames(sample_rate, samples.len());
    if fade > 1 {
        apply_edge_fade(samples, fade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiling_truncates_the_final_copy() {
        let tiled = tile_loop(&[1.0, 2.0, 3.0], 7);
        assert_eq!(tiled, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0]);
        assert_eq!(tile_loop(&[], 3), vec![0.0; 3]);
        assert!(tile_loop(&[1.0], 0).is_empty());
    }

    #[test]
    fn edge_fade_zeroes_both_ends() {
        let mut samples = vec![1.0; 10];
        apply_edge_fade(&mut samples, 3);
        assert_eq!(samples, vec![0.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn edge_fade_never_overlaps() {
        assert_eq!(edge_fade_frames(44_100, 100), 50);
        assert_eq!(edge_fade_frames(44_100, 1), 0);
        assert_eq!(edge_fade_frames(44_100, 44_100), 441);
    }

    #[test]
    fn finishing_a_single_sample_skips_the_fade() {
        let mut samples = vec![0.5];
        finish_cell(&mut samples, 44_100, 1.3, 0.8);
        assert!((samples[0] - (0.65_f32).tanh() * 0.8).abs() < 1e-6);
    }

    #[test]
    fn interleaving_alternates_channels() {
        let buffer = AudioBuffer::Stereo {
            left: vec![1.0, 2.0],
            right: vec![-1.0, -2.0],
        };
        assert_eq!(buffer.interleaved(), vec![1.0, -1.0, 2.0, -2.0]);
        assert_eq!(buffer.frames(), 2);
        assert_eq!(buffer.channel_count(), 2);
    }

    #[test]
    fn clamp_unit_bounds_every_channel() {
        let mut buffer = AudioBuffer::Stereo {
            left: vec![1.5, -0.2],
            right: vec![-4.0, 0.3],
        };
        buffer.clamp_unit();
        assert!(buffer.samples().all(|sample| (-1.0..=1.0).contains(&sample)));
        assert_eq!(buffer.channel(1), Some(&[-1.0, 0.3][..]));
    }

    #[test]
    fn empty_buffers_keep_their_layout() {
        let buffer = AudioBuffer::empty(ChannelLayout::Stereo);
        assert!(buffer.is_empty());
        assert_eq!(buffer.layout(), ChannelLayout::Stereo);
    }
}
