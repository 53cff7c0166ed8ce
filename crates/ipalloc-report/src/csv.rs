//! CSV output of the produced tables.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ipalloc_transform::OutputFrame;
use polars::prelude::{CsvWriter, SerWriter};
use tracing::debug;

/// Writes `<table>.csv` into `output_dir` and returns its path.
pub fn write_frame_csv(output_dir: &Path, frame: &OutputFrame) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}.csv", frame.name()));
    let mut file =
        File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut data = frame.data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut data)
        .with_context(|| format!("write {}", path.display()))?;
    debug!(table = %frame.name(), rows = frame.record_count(), path = %path.display(), "wrote csv");
    Ok(path)
}

/// Writes every frame, creating `output_dir` when needed.
pub fn write_csv_outputs(output_dir: &Path, frames: &[OutputFrame]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    frames
        .iter()
        .map(|frame| write_frame_csv(output_dir, frame))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_transform::OutputTable;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn writes_header_and_rows() {
        let df = DataFrame::new(vec![
            Column::new("RIR".into(), vec!["APNIC", "Unknown"]),
            Column::new("Countries".into(), vec![2u64, 1]),
            Column::new("ipv4".into(), vec![768u64, 256]),
            Column::new("percentv4".into(), vec![75.0, 25.0]),
        ])
        .expect("frame");
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = write_csv_outputs(
            &dir.path().join("out"),
            &[OutputFrame::new(OutputTable::RirShares, df)],
        )
        .expect("write");
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("rir_shares.csv"));
        let text = std::fs::read_to_string(&paths[0]).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "RIR,Countries,ipv4,percentv4");
        assert!(lines[1].starts_with("APNIC,2,768,75"));
        assert_eq!(lines.len(), 3);
    }
}
