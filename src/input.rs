//! Request log parsing.
//!
//! The capture proxy emits one JSON object per line; batch tooling often
//! wraps the same records in a JSON array. Both shapes are accepted.
//! Malformed records are fatal: nothing is classified from a log we cannot
//! fully read.

use crate::error::{Result, ScopeError};
use crate::model::RequestRecord;

/// Parse a request log from raw text, auto-detecting array vs JSON-lines.
pub fn parse_records(content: &str) -> Result<Vec<RequestRecord>> {
    let records = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<RequestRecord>>(content)
            .map_err(|e| ScopeError::Input(format!("invalid request array: {}", e)))?
    } else {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: RequestRecord = serde_json::from_str(line)
                .map_err(|e| ScopeError::Input(format!("line {}: {}", idx + 1, e)))?;
            records.push(record);
        }
        records
    };

    for record in &records {
        if !record.path.starts_with('/') {
            return Err(ScopeError::Input(format!(
                "path does not start with '/': {:?}",
                record.path
            )));
        }
    }

    Ok(records)
}
