use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::buffer::AudioBuffer;

pub const PCM_SCALE: f32 = 32_767.0;

/// Interleaved 16-bit samples: clamp to `[-1, 1]`, scale by 32767, truncate toward zero.
#[must_use]
pub fn pcm16_samples(buffer: &AudioBuffer) -> Vec<i16> {
    buffer
        .interleaved()
        .into_iter()
        .map(|sample| (sample.clamp(-1.0, 1.0) * PCM_SCALE) as i16)
        .collect()
}

/// Little-endian bytes of [`pcm16_samples`].
#[must_use]
pub fn pcm16_bytes(buffer: &AudioBuffer) -> Vec<u8> {
    let samples = pcm16_samples(buffer);
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

#[must_use]
pub fn wav_spec(buffer: &AudioBuffer, sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: buffer.channel_count(),
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Writes `buffer` as 16-bit PCM WAV.
///
/// Samples go to a temp file next to `path` first, so an interrupted export
/// never leaves a truncated file behind.
#[instrument(skip(buffer), fields(path = %path.display(), frames = buffer.frames(), channels = buffer.channel_count()))]
pub fn export_wav(buffer: &AudioBuffer, sample_rate: u32, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    fs::create_dir_all(&parent).with_context(|| {
        format!(
            "failed to create wav output directory: {}",
            parent.display()
        )
    })?;

    let mut temp_file = tempfile::NamedTempFile::new_in(&parent)
        .context("failed to create temp wav file")?;
    {
        let mut writer = hound::WavWriter::new(
            BufWriter::new(temp_file.as_file_mut()),
            wav_spec(buffer, sample_rate),
        )
        .with_context(|| format!("failed to start wav file: {}", path.display()))?;

        let mut written = 0_usize;
        for sample in pcm16_samples(buffer) {
            writer
                .write_sample(sample)
                .context("failed to write wav sample")?;
            written += 1;
        }
        writer.finalize().context("failed to finalize wav file")?;
        debug!(samples = written, "wav samples encoded");
    }

    temp_file
        .persist(path)
        .map_err(|error| anyhow::anyhow!(error.error))
        .with_context(|| format!("failed to persist wav file: {}", path.display()))?;

    info!("wav export completed");
    Ok(())
}
