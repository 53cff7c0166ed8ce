//! Artifacts of a run: one CSV per table, `diagnostics.json` and
//! `manifest.json`.

pub mod csv;
pub mod manifest;

use std::path::{Path, PathBuf};

use anyhow::Result;
use ipalloc_ingest::FetchedSource;
use ipalloc_model::{Diagnostics, YearRange};
use ipalloc_transform::OutputFrame;
use ipalloc_validate::write_diagnostics_json;
use tracing::info;

pub use crate::csv::{write_csv_outputs, write_frame_csv};
pub use crate::manifest::{
    ArtifactEntry, MANIFEST_FILE_NAME, RunManifest, SourceFingerprint, sha256_hex, write_manifest,
};

/// Paths of everything written for one run.
#[derive(Debug, Clone)]
pub struct WrittenArtifacts {
    pub tables: Vec<PathBuf>,
    pub diagnostics: PathBuf,
    pub manifest: PathBuf,
}

/// Writes all artifacts into `output_dir`; the manifest is written last and
/// fingerprints every other file.
pub fn write_outputs(
    output_dir: &Path,
    frames: &[OutputFrame],
    diagnostics: &Diagnostics,
    sources: &[FetchedSource],
    years: YearRange,
) -> Result<WrittenArtifacts> {
    let tables = write_csv_outputs(output_dir, frames)?;
    let diagnostics_path = write_diagnostics_json(output_dir, diagnostics)?;

    let mut manifest = RunManifest::new(
        years,
        sources.iter().map(SourceFingerprint::from_fetched).collect(),
    );
    for (path, frame) in tables.iter().zip(frames) {
        manifest.add_artifact(ArtifactEntry::from_path(path, Some(frame.record_count()))?);
    }
    manifest.add_artifact(ArtifactEntry::from_path(&diagnostics_path, None)?);
    let manifest_path = write_manifest(output_dir, &manifest)?;
    info!(
        output_dir = %output_dir.display(),
        tables = tables.len(),
        "wrote run artifacts"
    );
    Ok(WrittenArtifacts {
        tables,
        diagnostics: diagnostics_path,
        manifest: manifest_path,
    })
}
