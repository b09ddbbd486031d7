//! Batch rendering of every cell in one track of a grid.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    context::Context,
    engine::{self, RenderRequest},
    generators::GeneratorKind,
};

/// File name for one rendered cell: `<generator>-t<track>-c<cell>.wav`.
#[must_use]
pub fn cell_file_name(kind: GeneratorKind, track_index: i64, cell_index: i64) -> String {
    format!("{}-t{track_index}-c{cell_index}.wav", kind.name())
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub generator: GeneratorKind,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub cells_total: i64,
    pub track_index: i64,
    /// Extra entries merged under the cell coordinates.
    pub context: Context,
}

impl GridRequest {
    fn cell_request(&self, cell_index: i64) -> RenderRequest {
        let mut context = self.context.clone();
        context.merge(&Context::cell(cell_index, self.cells_total, self.track_index));
        RenderRequest::new(self.generator, self.sample_rate, self.duration_seconds)
            .with_context(context)
    }
}

/// Renders cells `0..cells_total` in parallel and writes one WAV per cell into `out_dir`.
///
/// Returned paths are ordered by cell index.
#[instrument(skip(request), fields(generator = %request.generator, cells_total = request.cells_total, track_index = request.track_index))]
pub fn render_grid(request: &GridRequest, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if request.cells_total < 1 {
        bail!("cells_total must be at least 1, got {}", request.cells_total);
    }

    let paths = (0..request.cells_total)
        .into_par_iter()
        .map(|cell_index| {
            let path = out_dir.join(cell_file_name(
                request.generator,
                request.track_index,
                cell_index,
            ));
            engine::render_to_wav(&request.cell_request(cell_index), &path)
                .with_context(|| format!("failed to render cell {cell_index}"))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(cells = paths.len(), out_dir = %out_dir.display(), "grid rendered");
    Ok(paths)
}
