use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Analysis configuration from `.actionscope.toml`, the environment, and
/// CLI flags. Every field is optional: a missing token just disables the
/// disambiguation lookups, a missing repository disables the filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Repository under analysis, `owner/repo`.
    #[serde(default)]
    pub repository: Option<String>,

    /// GitHub API base URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Token for disambiguation calls. Env or CLI only, never the file.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# actionscope configuration

# Repository under analysis (owner/repo). Requests to other repositories
# are excluded from the manifest.
# repository = "octocat/hello-world"

# GitHub API base URL, for GHES deployments.
# api_url = "https://api.github.com"

# The disambiguation token is read from the GITHUB_TOKEN environment
# variable, never from this file.
"#
    }
}
