//! Every registered generator and the shared render contract.
//!
//! A generator turns `(sample_rate, duration, context)` into a finished buffer:
//! it sizes the output with [`sample_count`], returns silence for an empty
//! size, draws randomness only from its own seeded stream and hands back
//! samples already clamped into `[-1, 1]`.

mod cells;
mod drums;
mod textures;
mod tones;

use std::{fmt, str::FromStr};

use tracing::{debug, instrument};

use crate::{
    buffer::{AudioBuffer, ChannelLayout},
    context::Context,
    engine::EngineError,
    primitives::time_axis,
    seed::SeedRecipe,
    time::sample_count,
};

pub use cells::{CELL_LOOP_DRIVE, CELL_LOOP_GAIN, SKIP_DENSITY_DRIVE, SKIP_DENSITY_GAIN};
pub use drums::{BOOM_BAP_92, HOUSE_128, MINIMAL_TECHNO_124};

/// Output size and rate of one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub sample_rate: u32,
    pub frames: usize,
    pub duration_seconds: f64,
}

impl Timeline {
    #[must_use]
    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(self.frames, self.sample_rate)
    }

    /// `floor(seconds * sample_rate)`, at least one frame.
    #[must_use]
    pub fn frames_at_least_one(&self, seconds: f64) -> usize {
        sample_count(self.sample_rate, seconds).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    Sine,
    ClickTrain,
    SineTicks,
    GlitchPulses,
    SparseNoise,
    GlitchWash,
    ShimmerPad,
    TapeHaze,
    House128,
    BoomBap92,
    MinimalTechno124,
    CellwiseDegradeLoop,
    SkipDensity,
}

impl GeneratorKind {
    pub const ALL: [Self; 13] = [
        Self::Sine,
        Self::ClickTrain,
        Self::SineTicks,
        Self::GlitchPulses,
        Self::SparseNoise,
        Self::GlitchWash,
        Self::ShimmerPad,
        Self::TapeHaze,
        Self::House128,
        Self::BoomBap92,
        Self::MinimalTechno124,
        Self::CellwiseDegradeLoop,
        Self::SkipDensity,
    ];

    #[must_use]
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::ClickTrain => "click-train",
            Self::SineTicks => "sine-ticks",
            Self::GlitchPulses => "glitch-pulses",
            Self::SparseNoise => "sparse-noise",
            Self::GlitchWash => "glitch-wash",
            Self::ShimmerPad => "shimmer-pad",
            Self::TapeHaze => "tape-haze",
            Self::House128 => "house-128",
            Self::BoomBap92 => "boom-bap-92",
            Self::MinimalTechno124 => "minimal-techno-124",
            Self::CellwiseDegradeLoop => "cellwise-degrade-loop",
            Self::SkipDensity => "skip-density",
        }
    }

    #[must_use]
    pub fn channel_layout(self) -> ChannelLayout {
        match self {
            Self::CellwiseDegradeLoop | Self::SkipDensity => ChannelLayout::Mono,
            _ => ChannelLayout::Stereo,
        }
    }

    /// Whether the output depends on the cell coordinates in the context.
    #[must_use]
    pub fn is_cell_based(self) -> bool {
        matches!(self, Self::CellwiseDegradeLoop | Self::SkipDensity)
    }

    #[must_use]
    pub fn seed_recipe(self) -> SeedRecipe {
        match self {
            Self::CellwiseDegradeLoop => SeedRecipe::with_multipliers(1_337, 99_991, 17),
            Self::SkipDensity => SeedRecipe::with_multipliers(2_021, 4_243, 13),
            Self::SparseNoise => SeedRecipe::new(7),
            Self::GlitchWash => SeedRecipe::new(12),
            Self::ShimmerPad => SeedRecipe::new(330),
            Self::TapeHaze => SeedRecipe::new(140),
            Self::House128 => SeedRecipe::new(128),
            Self::BoomBap92 => SeedRecipe::new(92),
            Self::MinimalTechno124 => SeedRecipe::new(124),
            Self::Sine | Self::ClickTrain | Self::SineTicks | Self::GlitchPulses => {
                SeedRecipe::new(0)
            }
        }
    }

    #[instrument(skip(self, context), fields(generator = self.name()))]
    pub fn generate(self, sample_rate: u32, duration_seconds: f64, context: &Context) -> AudioBuffer {
        let frames = sample_count(sample_rate, duration_seconds);
        if frames == 0 {
            debug!("empty frame count, returning silence");
            return AudioBuffer::empty(self.channel_layout());
        }

        let timeline = Timeline {
            sample_rate,
            frames,
            duration_seconds,
        };
        let position = context.cell_position();
        let progress = position.progress();
        let mut rng = self.seed_recipe().stream(&position);

        let mut buffer = match self {
            Self::Sine => AudioBuffer::from_mono_duplicated(tones::sine(&timeline)),
            Self::ClickTrain => AudioBuffer::from_mono_duplicated(tones::click_train(&timeline)),
            Self::SineTicks => AudioBuffer::from_mono_duplicated(tones::sine_ticks(&timeline)),
            Self::GlitchPulses => {
                AudioBuffer::from_mono_duplicated(tones::glitch_pulses(&timeline))
            }
            Self::SparseNoise => {
                AudioBuffer::from_mono_duplicated(tones::sparse_noise(&timeline, &mut rng))
            }
            Self::GlitchWash => {
                AudioBuffer::from_mono_duplicated(textures::glitch_wash(&timeline, &mut rng))
            }
            Self::ShimmerPad => {
                AudioBuffer::from_mono_duplicated(textures::shimmer_pad(&timeline, &mut rng))
            }
            Self::TapeHaze => {
                AudioBuffer::from_mono_duplicated(textures::tape_haze(&timeline, &mut rng))
            }
            Self::House128 => {
                AudioBuffer::from_mono_duplicated(drums::render(&HOUSE_128, &timeline, &mut rng))
            }
            Self::BoomBap92 => {
                AudioBuffer::from_mono_duplicated(drums::render(&BOOM_BAP_92, &timeline, &mut rng))
            }
            Self::MinimalTechno124 => AudioBuffer::from_mono_duplicated(drums::render(
                &MINIMAL_TECHNO_124,
                &timeline,
                &mut rng,
            )),
            Self::CellwiseDegradeLoop => {
                AudioBuffer::Mono(cells::cellwise_degrade_loop(&timeline, progress, &mut rng))
            }
            Self::SkipDensity => {
                AudioBuffer::Mono(cells::skip_density(&timeline, progress, &mut rng))
            }
        };
        buffer.clamp_unit();

        debug!(
            frames = buffer.frames(),
            channels = buffer.channel_count(),
            cell_index = position.cell_index,
            track_index = position.track_index,
            progress,
            "generator finished"
        );
        buffer
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownGenerator(value.to_string()))
    }
}
