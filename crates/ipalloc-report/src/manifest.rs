//! Run manifest: what was read, what was written, and fingerprints of both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use ipalloc_ingest::FetchedSource;
use ipalloc_model::YearRange;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const MANIFEST_SCHEMA: &str = "ipalloc.manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub name: String,
    pub location: String,
    pub bytes: usize,
    pub sha256: String,
    pub elapsed_ms: u64,
}

impl SourceFingerprint {
    pub fn from_fetched(source: &FetchedSource) -> Self {
        Self {
            name: source.kind.name().to_string(),
            location: source.location.to_string(),
            bytes: source.body.len(),
            sha256: sha256_hex(source.body.as_bytes()),
            elapsed_ms: u64::try_from(source.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub file: String,
    pub rows: Option<usize>,
    pub bytes: usize,
    pub sha256: String,
}

impl ArtifactEntry {
    /// Fingerprints a written file.
    pub fn from_path(path: &Path, rows: Option<usize>) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file,
            rows,
            bytes: data.len(),
            sha256: sha256_hex(&data),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema: String,
    pub schema_version: u32,
    pub generated_at: String,
    pub tool_version: String,
    pub years: YearRange,
    pub sources: Vec<SourceFingerprint>,
    pub artifacts: Vec<ArtifactEntry>,
}

impl RunManifest {
    pub fn new(years: YearRange, sources: Vec<SourceFingerprint>) -> Self {
        Self {
            schema: MANIFEST_SCHEMA.to_string(),
            schema_version: MANIFEST_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            years,
            sources,
            artifacts: Vec::new(),
        }
    }

    pub fn add_artifact(&mut self, entry: ArtifactEntry) {
        self.artifacts.push(entry);
    }
}

pub fn write_manifest(output_dir: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    let path = output_dir.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
    std::fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn artifact_entry_fingerprints_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "abc").expect("write");
        let entry = ArtifactEntry::from_path(&path, Some(0)).expect("entry");
        assert_eq!(entry.file, "table.csv");
        assert_eq!(entry.bytes, 3);
        assert_eq!(entry.sha256, sha256_hex(b"abc"));
    }
}
