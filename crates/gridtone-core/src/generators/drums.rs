use super::Timeline;
use crate::{
    pattern::{DrumPattern, DrumVoice, Lane, StepSet},
    seed::SignalRng,
};

pub const HOUSE_128: DrumPattern = DrumPattern {
    bpm: 128.0,
    lanes: &[
        Lane {
            name: "kick",
            voice: DrumVoice::Kick {
                freq_hz: 50.0,
                decay: 0.12,
                sweep_rate: 9.0,
                sweep_depth: 4.0,
            },
            hit_seconds: 0.5,
            steps: StepSet::Listed(&[0, 4, 8, 12]),
        },
        Lane {
            name: "snare",
            voice: DrumVoice::Snare {
                decay: 0.07,
                noise_gain: 0.7,
                tone_hz: 220.0,
            },
            hit_seconds: 0.2,
            steps: StepSet::Listed(&[4, 12]),
        },
        Lane {
            name: "hat",
            voice: DrumVoice::Noise {
                decay: 0.025,
                gain: 0.25,
            },
            hit_seconds: 0.1,
            steps: StepSet::Every,
        },
    ],
};

pub const BOOM_BAP_92: DrumPattern = DrumPattern {
    bpm: 92.0,
    lanes: &[
        Lane {
            name: "kick",
            voice: DrumVoice::Kick {
                freq_hz: 58.0,
                decay: 0.13,
                sweep_rate: 7.0,
                sweep_depth: 3.5,
            },
            hit_seconds: 0.6,
            steps: StepSet::Listed(&[0, 7, 10]),
        },
        Lane {
            name: "snare",
            voice: DrumVoice::Snare {
                decay: 0.12,
                noise_gain: 0.8,
                tone_hz: 190.0,
            },
            hit_seconds: 0.3,
            steps: StepSet::Listed(&[4, 12]),
        },
        Lane {
            name: "hat",
            voice: DrumVoice::Noise {
                decay: 0.035,
                gain: 0.25,
            },
            hit_seconds: 0.15,
            steps: StepSet::Listed(&[1, 3, 5, 7, 9, 11, 13, 15]),
        },
    ],
};

pub const MINIMAL_TECHNO_124: DrumPattern = DrumPattern {
    bpm: 124.0,
    lanes: &[
        Lane {
            name: "kick",
            voice: DrumVoice::Kick {
                freq_hz: 48.0,
                decay: 0.16,
                sweep_rate: 8.0,
                sweep_depth: 4.0,
            },
            hit_seconds: 0.5,
            steps: StepSet::Listed(&[0, 4, 8, 12]),
        },
        Lane {
            name: "clap",
            voice: DrumVoice::Noise {
                decay: 0.06,
                gain: 0.5,
            },
            hit_seconds: 0.2,
            steps: StepSet::Listed(&[4, 12]),
        },
        Lane {
            name: "hat",
            voice: DrumVoice::Noise {
                decay: 0.02,
                gain: 0.2,
            },
            hit_seconds: 0.08,
            steps: StepSet::Listed(&[2, 6, 10, 14]),
        },
    ],
};

pub(super) fn render(pattern: &DrumPattern, timeline: &Timeline, rng: &mut SignalRng) -> Vec<f32> {
    pattern.render(
        timeline.sample_rate,
        timeline.duration_seconds,
        timeline.frames,
        rng,
    )
}
