pub mod console;
pub mod json;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manifest::PermissionManifest;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl OutputFormat {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "console" | "text" | "table" => Some(Self::Console),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Render the manifest into the specified format. `unmatched` holds the
/// method+path of requests no rule recognized; pass `None` to omit the
/// diagnostic section.
pub fn render(
    manifest: &PermissionManifest,
    unmatched: Option<&[String]>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(manifest, unmatched)),
        OutputFormat::Json => json::render(manifest, unmatched),
    }
}
