use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::{
    context,
    engine::{self, RenderRequest},
    export,
};

pub const FINGERPRINT_SCHEMA_VERSION: u32 = 1;

/// Stable summary of one render, used to detect drift between builds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderFingerprint {
    pub schema_version: u32,
    pub generator: String,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub channels: u16,
    pub frames: usize,
    pub context: context::Context,
    pub pcm_sha256: String,
}

#[instrument(skip(request), fields(generator = %request.generator))]
pub fn compute_fingerprint(request: &RenderRequest) -> Result<RenderFingerprint> {
    let buffer = engine::render(request)?;
    let pcm_bytes = export::pcm16_bytes(&buffer);

    Ok(RenderFingerprint {
        schema_version: FINGERPRINT_SCHEMA_VERSION,
        generator: request.generator_kind()?.name().to_string(),
        sample_rate: request.sample_rate,
        duration_seconds: request.duration_seconds,
        channels: buffer.channel_count(),
        frames: buffer.frames(),
        context: request.context.clone(),
        pcm_sha256: hash_hex(&pcm_bytes),
    })
}

pub fn read_fingerprint(path: &Path) -> Result<RenderFingerprint> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read fingerprint: {}", path.display()))?;
    let fingerprint: RenderFingerprint =
        serde_json::from_slice(&bytes).context("failed to parse fingerprint json")?;
    Ok(fingerprint)
}

pub fn write_fingerprint(path: &Path, fingerprint: &RenderFingerprint) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create fingerprint directory: {}", parent.display())
        })?;
    }

    let json =
        serde_json::to_vec_pretty(fingerprint).context("failed to encode fingerprint json")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write fingerprint: {}", path.display()))?;
    Ok(())
}

fn hash_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}
