use crate::manifest::PermissionManifest;

/// Render the manifest as a human-readable table, in the order permissions
/// first appeared in the request log.
pub fn render(manifest: &PermissionManifest, unmatched: Option<&[String]>) -> String {
    let mut output = String::new();

    if manifest.is_empty() {
        output.push_str("\n  No token permissions required.\n");
    } else {
        output.push_str(&format!("\n  {:<24} LEVEL\n", "PERMISSION"));
        output.push_str(&format!("  {}\n", "-".repeat(30)));
        for (permission, level) in manifest.iter() {
            output.push_str(&format!("  {:<24} {}\n", permission.to_string(), level));
        }
    }

    if let Some(unmatched) = unmatched {
        if !unmatched.is_empty() {
            output.push_str(&format!(
                "\n  {} endpoint(s) matched no rule and are excluded:\n",
                unmatched.len()
            ));
            for entry in unmatched {
                output.push_str(&format!("    {}\n", entry));
            }
        }
    }

    output.push('\n');
    output
}
