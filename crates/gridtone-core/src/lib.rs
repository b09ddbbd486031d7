pub mod buffer;
pub mod context;
pub mod degrade;
pub mod diagnostics;
pub mod engine;
pub mod export;
pub mod fingerprint;
pub mod fragment;
pub mod generators;
pub mod grid;
pub mod pattern;
pub mod primitives;
pub mod seed;
pub mod time;

pub use buffer::{AudioBuffer, ChannelLayout};
pub use context::{CellPosition, Context};
pub use diagnostics::{TelemetryGuard, init_tracing, init_tracing_with_options};
pub use engine::{EngineError, RenderRequest, render, render_to_wav};
pub use export::{export_wav, pcm16_samples};
pub use fingerprint::{
    FINGERPRINT_SCHEMA_VERSION, RenderFingerprint, compute_fingerprint, read_fingerprint,
    write_fingerprint,
};
pub use generators::GeneratorKind;
pub use grid::{GridRequest, render_grid};
pub use seed::{SeedRecipe, SignalRng, create_rng};
