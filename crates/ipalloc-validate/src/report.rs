//! Diagnostics report (JSON).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use ipalloc_model::{Diagnostics, Issue, Severity};
use serde::Serialize;

pub const REPORT_SCHEMA: &str = "ipalloc.diagnostics";
pub const REPORT_SCHEMA_VERSION: u32 = 1;
pub const REPORT_FILE_NAME: &str = "diagnostics.json";

#[derive(Debug, Serialize)]
struct DiagnosticsPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    error_count: usize,
    warning_count: usize,
    info_count: usize,
    issues: Vec<IssueJson<'a>>,
}

#[derive(Debug, Serialize)]
struct IssueJson<'a> {
    code: &'static str,
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
    detail: &'a Issue,
}

/// Renders the diagnostics as pretty JSON.
pub fn diagnostics_json(diagnostics: &Diagnostics) -> Result<String> {
    let payload = DiagnosticsPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        error_count: diagnostics.error_count(),
        warning_count: diagnostics.warning_count(),
        info_count: diagnostics.count_by_severity(Severity::Info),
        issues: diagnostics
            .issues
            .iter()
            .map(|issue| IssueJson {
                code: issue.code(),
                severity: issue.default_severity(),
                message: issue.message(),
                count: issue.count(),
                detail: issue,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&payload).context("serialize diagnostics")
}

/// Writes `diagnostics.json` into `output_dir`.
pub fn write_diagnostics_json(output_dir: &Path, diagnostics: &Diagnostics) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let output_path = output_dir.join(REPORT_FILE_NAME);
    let json = diagnostics_json(diagnostics)?;
    std::fs::write(&output_path, format!("{json}\n"))
        .with_context(|| format!("write {}", output_path.display()))?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipalloc_model::ResourceType;

    #[test]
    fn writes_counts_and_issue_details() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Issue::FetchFailed {
            source: "arin".to_string(),
            message: "timed out".to_string(),
        });
        diagnostics.push(Issue::UndatedRecords {
            resource_type: ResourceType::Ipv4,
            count: 3,
        });
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_diagnostics_json(dir.path(), &diagnostics).expect("write");
        let text = std::fs::read_to_string(path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["schema"], REPORT_SCHEMA);
        assert_eq!(value["error_count"], 1);
        assert_eq!(value["info_count"], 1);
        assert_eq!(value["issues"][0]["code"], "ING001");
        assert_eq!(value["issues"][0]["severity"], "error");
        assert_eq!(value["issues"][0]["detail"]["kind"], "fetch_failed");
        assert_eq!(value["issues"][1]["count"], 3);
        assert!(value["issues"][0].get("count").is_none());
    }
}
