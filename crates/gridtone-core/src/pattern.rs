//! Fixed-tempo step sequencer for the drum-loop generators.

use std::f64::consts::TAU;

use tracing::{debug, trace};

use crate::{
    primitives::{add_at, exp_decay, time_axis, uniform_noise},
    seed::SignalRng,
    time::{sample_count, step_onset_sample, step_seconds, steps_in_duration},
};

/// Steps per beat: one step is a sixteenth note in 4/4.
pub const STEPS_PER_BEAT: u32 = 4;
pub const STEPS_PER_BAR: usize = 16;

const SNARE_TONE_GAIN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrumVoice {
    /// Decaying sine whose pitch falls from `freq_hz * (1 + sweep_depth)` to `freq_hz`.
    Kick {
        freq_hz: f64,
        decay: f64,
        sweep_rate: f64,
        sweep_depth: f64,
    },
    /// Decaying blend of noise and a low tone.
    Snare {
        decay: f64,
        noise_gain: f32,
        tone_hz: f64,
    },
    /// Decaying noise burst, used for hats and claps.
    Noise { decay: f64, gain: f32 },
}

impl DrumVoice {
    pub fn synthesize(&self, frames: usize, sample_rate: u32, rng: &mut SignalRng) -> Vec<f32> {
        let t = time_axis(frames, sample_rate);
        match *self {
            Self::Kick {
                freq_hz,
                decay,
                sweep_rate,
                sweep_depth,
            } => {
                let env = exp_decay(&t, decay);
                t.iter()
                    .zip(&env)
                    .map(|(&time, env)| {
                        let sweep = (-time * sweep_rate).exp();
                        let freq = freq_hz * (1.0 + sweep_depth * sweep);
                        (TAU * freq * time).sin() as f32 * env
                    })
                    .collect()
            }
            Self::Snare {
                decay,
                noise_gain,
                tone_hz,
            } => {
                let env = exp_decay(&t, decay);
                let noise = uniform_noise(frames, rng);
                t.iter()
                    .zip(&noise)
                    .zip(&env)
                    .map(|((&time, noise), env)| {
                        let tone = (TAU * tone_hz * time).sin() as f32 * SNARE_TONE_GAIN;
                        (noise * noise_gain + tone) * env
                    })
                    .collect()
            }
            Self::Noise { decay, gain } => {
                let env = exp_decay(&t, decay);
                let noise = uniform_noise(frames, rng);
                noise
                    .iter()
                    .zip(&env)
                    .map(|(noise, env)| noise * env * gain)
                    .collect()
            }
        }
    }
}

/// Static set of step indices an instrument fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSet {
    Every,
    Listed(&'static [usize]),
}

impl StepSet {
    #[must_use]
    pub fn contains(&self, step: usize) -> bool {
        match self {
            Self::Every => true,
            Self::Listed(steps) => steps.contains(&step),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub name: &'static str,
    pub voice: DrumVoice,
    pub hit_seconds: f64,
    pub steps: StepSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumPattern {
    pub bpm: f64,
    pub lanes: &'static [Lane],
}

impl DrumPattern {
    #[must_use]
    pub fn step_seconds(&self) -> f64 {
        step_seconds(self.bpm, STEPS_PER_BEAT)
    }

    /// Frame each step starts on, for every step that fits in `duration_seconds`.
    #[must_use]
    pub fn onsets(&self, sample_rate: u32, duration_seconds: f64) -> Vec<usize> {
        let step = self.step_seconds();
        (0..steps_in_duration(duration_seconds, step))
            .map(|index| step_onset_sample(index, step, sample_rate))
            .collect()
    }

    /// Frames at which `lane` fires inside a buffer of `frames` samples.
    #[must_use]
    pub fn lane_onsets(
        &self,
        lane: &str,
        sample_rate: u32,
        duration_seconds: f64,
        frames: usize,
    ) -> Vec<usize> {
        let Some(lane) = self.lanes.iter().find(|candidate| candidate.name == lane) else {
            return Vec::new();
        };
        self.onsets(sample_rate, duration_seconds)
            .into_iter()
            .enumerate()
            .take_while(|(_, onset)| *onset < frames)
            .filter(|(index, _)| lane.steps.contains(*index))
            .map(|(_, onset)| onset)
            .collect()
    }

    /// Overlays every matching hit additively; hits running past the end are truncated.
    pub fn render(
        &self,
        sample_rate: u32,
        duration_seconds: f64,
        frames: usize,
        rng: &mut SignalRng,
    ) -> Vec<f32> {
        let mut output = vec![0.0_f32; frames];
        let mut hits = 0_usize;

        for (index, onset) in self.onsets(sample_rate, duration_seconds).into_iter().enumerate() {
            if onset >= frames {
                break;
            }
            for lane in self.lanes {
                if !lane.steps.contains(index) {
                    continue;
                }
                let hit_frames = sample_count(sample_rate, lane.hit_seconds);
                let hit = lane.voice.synthesize(hit_frames, sample_rate, rng);
                add_at(&mut output, &hit, onset);
                hits += 1;
                trace!(step = index, onset, lane = lane.name, "hit overlaid");
            }
        }

        debug!(bpm = self.bpm, frames, hits, "pattern rendered");
        output
    }
}
