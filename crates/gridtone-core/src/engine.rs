use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{buffer::AudioBuffer, context::Context, export, generators::GeneratorKind};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),
    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),
    #[error("invalid context entry: {0}")]
    InvalidContextEntry(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(value: anyhow::Error) -> Self {
        Self::Io(format!("{value:#}"))
    }
}

/// Everything needed to reproduce one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub generator: String,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    #[serde(default)]
    pub context: Context,
}

impl RenderRequest {
    #[must_use]
    pub fn new(generator: GeneratorKind, sample_rate: u32, duration_seconds: f64) -> Self {
        Self {
            generator: generator.name().to_string(),
            sample_rate,
            duration_seconds,
            context: Context::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn generator_kind(&self) -> Result<GeneratorKind, EngineError> {
        self.generator.parse()
    }
}

/// Resolves and runs the requested generator.
#[instrument(skip(request), fields(generator = %request.generator, sample_rate = request.sample_rate, duration_seconds = request.duration_seconds))]
pub fn render(request: &RenderRequest) -> Result<AudioBuffer, EngineError> {
    let kind = request.generator_kind()?;
    if request.sample_rate == 0 {
        return Err(EngineError::InvalidSampleRate(request.sample_rate));
    }

    Ok(kind.generate(
        request.sample_rate,
        request.duration_seconds,
        &request.context,
    ))
}

/// Renders and writes a 16-bit PCM WAV, returning the number of frames written.
#[instrument(skip(request), fields(generator = %request.generator, path = %path.display()))]
pub fn render_to_wav(request: &RenderRequest, path: &Path) -> Result<usize, EngineError> {
    let buffer = render(request)?;
    export::export_wav(&buffer, request.sample_rate, path)?;
    info!(
        frames = buffer.frames(),
        channels = buffer.channel_count(),
        "render written"
    );
    Ok(buffer.frames())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_generators_are_reported_by_name() {
        let request = RenderRequest {
            generator: "kazoo".to_string(),
            sample_rate: 44_100,
            duration_seconds: 1.0,
            context: Context::new(),
        };
        let error = render(&request).unwrap_err();
        assert_eq!(error.to_string(), "unknown generator: kazoo");
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let request = RenderRequest::new(GeneratorKind::Sine, 0, 1.0);
        assert!(matches!(
            render(&request),
            Err(EngineError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn negative_duration_renders_silence() {
        let request = RenderRequest::new(GeneratorKind::House128, 44_100, -1.0);
        let buffer = render(&request).expect("negative duration is not an error");
        assert!(buffer.is_empty());
    }

    #[test]
    fn request_carries_context_into_the_generator() {
        let base = RenderRequest::new(GeneratorKind::CellwiseDegradeLoop, 22_050, 0.25);
        let first = render(&base.clone().with_context(Context::cell(0, 4, 0)))
            .expect("render should succeed");
        let last = render(&base.with_context(Context::cell(3, 4, 0)))
            .expect("render should succeed");
        assert_ne!(first, last);
    }
}
