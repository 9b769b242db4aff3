use serde::Serialize;

use crate::error::Result;
use crate::manifest::PermissionManifest;

#[derive(Serialize)]
struct JsonReport<'a> {
    permissions: &'a PermissionManifest,
    unmatched: &'a [String],
}

/// Render the manifest as a JSON object. The plain form is exactly
/// `{permission: level, ...}`; with unmatched diagnostics requested, the
/// manifest moves under a `permissions` key next to the `unmatched` list.
pub fn render(manifest: &PermissionManifest, unmatched: Option<&[String]>) -> Result<String> {
    let mut out = match unmatched {
        Some(unmatched) => serde_json::to_string_pretty(&JsonReport {
            permissions: manifest,
            unmatched,
        })?,
        None => serde_json::to_string_pretty(manifest)?,
    };
    out.push('\n');
    Ok(out)
}
