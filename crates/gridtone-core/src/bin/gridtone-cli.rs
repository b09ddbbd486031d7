use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, error::ErrorKind};
use gridtone_core::{
    Context, GeneratorKind, GridRequest, RenderRequest,
    context::{CELL_INDEX_KEY, CELLS_TOTAL_KEY, TRACK_INDEX_KEY},
    diagnostics::init_tracing,
    fingerprint::{compute_fingerprint, write_fingerprint},
    render_grid, render_to_wav,
};

#[derive(Debug, Parser)]
#[command(name = "gridtone-cli", version)]
#[command(about = "Render deterministic procedural audio cells to WAV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render one generator invocation to a 16-bit WAV file.
    Render {
        generator: String,
        output_path: PathBuf,
        #[arg(value_parser = parse_sample_rate)]
        sample_rate: u32,
        #[arg(allow_negative_numbers = true)]
        duration: f64,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Print every generator name with its channel layout.
    List,
    /// Render every cell of one grid track into a directory.
    Grid {
        generator: String,
        out_dir: PathBuf,
        #[arg(value_parser = parse_sample_rate)]
        sample_rate: u32,
        #[arg(allow_negative_numbers = true)]
        duration: f64,
        #[arg(long)]
        cells_total: i64,
        #[arg(long, default_value_t = 0)]
        track_index: i64,
        #[arg(long = "set", value_parser = Context::parse_assignment)]
        assignments: Vec<(String, f64)>,
    },
    /// Print or write the PCM fingerprint of a render.
    Fingerprint {
        generator: String,
        #[arg(value_parser = parse_sample_rate)]
        sample_rate: u32,
        #[arg(allow_negative_numbers = true)]
        duration: f64,
        #[command(flatten)]
        context: ContextArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Context sources, lowest precedence first.
#[derive(Debug, Args)]
struct ContextArgs {
    /// Flat TOML table of numeric context values.
    #[arg(long = "context")]
    file: Option<PathBuf>,
    /// Extra `key=value` context entries.
    #[arg(long = "set", value_parser = Context::parse_assignment)]
    assignments: Vec<(String, f64)>,
    #[arg(long, allow_negative_numbers = true)]
    cell_index: Option<i64>,
    #[arg(long)]
    cells_total: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    track_index: Option<i64>,
}

impl ContextArgs {
    fn resolve(&self) -> anyhow::Result<Context> {
        let mut context = match &self.file {
            Some(path) => Context::load(path)?,
            None => Context::new(),
        };
        context.merge(&self.assignments.iter().cloned().collect());

        let flags = [
            (CELL_INDEX_KEY, self.cell_index),
            (CELLS_TOTAL_KEY, self.cells_total),
            (TRACK_INDEX_KEY, self.track_index),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                context.insert(key, value as f64);
            }
        }
        Ok(context)
    }
}

/// Accepts integral or fractional input ("44100.0") and truncates it.
fn parse_sample_rate(raw: &str) -> Result<u32, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("sample rate must be a number, got {raw}"))?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(format!("sample rate out of range: {raw}"));
    }
    Ok(value as u32)
}

fn parse_generator(name: &str) -> anyhow::Result<GeneratorKind> {
    Ok(name.parse::<GeneratorKind>()?)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let _telemetry = init_tracing(&cli.log_dir)?;

    match cli.command {
        Commands::Render {
            generator,
            output_path,
            sample_rate,
            duration,
            context,
        } => {
            let kind = parse_generator(&generator)?;
            let request = RenderRequest::new(kind, sample_rate, duration)
                .with_context(context.resolve()?);
            let frames = render_to_wav(&request, &output_path)?;
            tracing::info!(path = %output_path.display(), frames, "render complete");
        }
        Commands::List => {
            for kind in GeneratorKind::all() {
                println!("{}\t{}", kind.name(), kind.channel_layout().name());
            }
        }
        Commands::Grid {
            generator,
            out_dir,
            sample_rate,
            duration,
            cells_total,
            track_index,
            assignments,
        } => {
            let request = GridRequest {
                generator: parse_generator(&generator)?,
                sample_rate,
                duration_seconds: duration,
                cells_total,
                track_index,
                context: assignments.into_iter().collect(),
            };
            for path in render_grid(&request, &out_dir)? {
                println!("{}", path.display());
            }
        }
        Commands::Fingerprint {
            generator,
            sample_rate,
            duration,
            context,
            output,
        } => {
            let kind = parse_generator(&generator)?;
            let request = RenderRequest::new(kind, sample_rate, duration)
                .with_context(context.resolve()?);
            let fingerprint = compute_fingerprint(&request)?;
            match output {
                Some(path) => {
                    write_fingerprint(&path, &fingerprint)?;
                    tracing::info!(path = %path.display(), "fingerprint written");
                }
                None => {
                    let json = serde_json::to_string_pretty(&fingerprint)
                        .context("failed to encode fingerprint json")?;
                    println!("{json}");
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
