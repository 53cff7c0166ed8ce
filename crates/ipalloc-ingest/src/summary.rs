//! Per-country allocation summary (JSON).
//!
//! The document is one object keyed by alpha-2 code:
//!
//! ```json
//! { "JP": { "name": "Japan", "ipv4": 190000000, "pop": 125000000, "percentv4": 5.1, "pcv4": 1.52 } }
//! ```
//!
//! Numbers may also arrive as strings. Anything that does not parse becomes
//! `None`; only a document that is not an object is an error. The derived
//! `percentv4` and `pcv4` fields are ignored and recomputed over the whole
//! pool.

use ipalloc_common::parse_u64;
use ipalloc_model::SummaryEntry;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Entries plus the number of keys whose value was not an object.
#[derive(Debug, Clone, Default)]
pub struct ParsedSummary {
    pub entries: Vec<SummaryEntry>,
    pub skipped: u64,
}

pub fn parse_summary(text: &str) -> Result<ParsedSummary> {
    let document: Value = serde_json::from_str(text)?;
    let Value::Object(map) = document else {
        return Err(IngestError::SummaryNotObject {
            found: json_kind(&document).to_string(),
        });
    };
    let mut parsed = ParsedSummary::default();
    for (code, details) in map {
        let Value::Object(fields) = details else {
            warn!(code, "summary entry is not an object");
            parsed.skipped += 1;
            continue;
        };
        parsed.entries.push(entry_from_fields(code, &fields));
    }
    debug!(
        entries = parsed.entries.len(),
        skipped = parsed.skipped,
        "parsed allocation summary"
    );
    Ok(parsed)
}

fn entry_from_fields(code: String, fields: &Map<String, Value>) -> SummaryEntry {
    SummaryEntry {
        code: code.trim().to_ascii_uppercase(),
        name: fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        ipv4: fields.get("ipv4").and_then(value_to_u64),
        pop: fields.get("pop").and_then(value_to_u64),
        ipv6: fields.get("ipv6").and_then(value_to_u64),
    }
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(|f| parse_u64(&f.to_string()))),
        Value::String(text) => parse_u64(text),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
