//! Results persistence module

use anyhow::{Context, Result};
use crate::conflict::CachedMatrix;
use crate::pipeline::SearchReport;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use serde_json::to_string_pretty;

/// Save the run report as `summary.json` in the output directory
pub fn save_report(report: &SearchReport, output_dir: &Path) -> Result<PathBuf> {
    log::info!("Saving summary to {}", output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let path = output_dir.join("summary.json");
    let mut file = File::create(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(to_string_pretty(report)?.as_bytes())?;

    Ok(path)
}

/// Write a conflict matrix and the inputs it was built from in bincode form
pub fn save_matrix(cached: &CachedMatrix, path: &Path) -> Result<()> {
    log::info!(
        "Caching conflict matrix ({} candidates) to {}",
        cached.matrix.size(),
        path.display()
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, cached)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.flush()?;

    Ok(())
}

/// Read a conflict matrix written by [`save_matrix`]
///
/// Fails on files whose matrix storage does not match its candidate count.
pub fn load_matrix(path: &Path) -> Result<CachedMatrix> {
    log::info!("Loading cached conflict matrix from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let cached: CachedMatrix = bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("decoding {}", path.display()))?;

    log::info!(
        "Loaded conflict matrix for {} candidates on {} vertices, patterns {:?}",
        cached.matrix.size(),
        cached.vertices,
        cached.patterns
    );
    Ok(cached)
}
