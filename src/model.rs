//! Core data types shared across the analysis pipeline.

use serde::{Deserialize, Serialize};

/// One observed HTTP call, as emitted by the capture proxy.
///
/// `method` and `path` are required; a record missing either fails input
/// parsing. `oidc` marks a call made with the identity-token credential
/// instead of the repository token.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub oidc: bool,
}

/// A GitHub Actions workflow permission name.
///
/// `Unknown` is the sentinel attached to requests no rule recognizes; the
/// aggregator drops it, so unrecognized endpoints never reach the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    Actions,
    Checks,
    Contents,
    Deployments,
    IdToken,
    Issues,
    Packages,
    Pages,
    PullRequests,
    RepositoryProjects,
    SecurityEvents,
    Statuses,
    Unknown,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Actions => "actions",
            Self::Checks => "checks",
            Self::Contents => "contents",
            Self::Deployments => "deployments",
            Self::IdToken => "id-token",
            Self::Issues => "issues",
            Self::Packages => "packages",
            Self::Pages => "pages",
            Self::PullRequests => "pull-requests",
            Self::RepositoryProjects => "repository-projects",
            Self::SecurityEvents => "security-events",
            Self::Statuses => "statuses",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Access level of a grant. `Write` dominates `Read` when aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
}

impl AccessLevel {
    /// Standard mapping for the generic resolver rules: GET reads,
    /// every other verb writes.
    pub fn for_method(method: &str) -> Self {
        if method == "GET" {
            Self::Read
        } else {
            Self::Write
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A single (permission, level) pair attributed to one observed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub permission: Permission,
    pub level: AccessLevel,
}

impl Grant {
    pub fn new(permission: Permission, level: AccessLevel) -> Self {
        Self { permission, level }
    }

    /// The sentinel grant for a request matching no rule.
    pub fn unknown() -> Self {
        Self::new(Permission::Unknown, AccessLevel::Read)
    }

    pub fn is_unknown(&self) -> bool {
        self.permission == Permission::Unknown
    }
}

/// Outcome of the issue-vs-pull-request identity check.
///
/// `Unknown` (the lookup could not be performed or failed in transit) is
/// distinct from `Issue`: it makes the classifier emit both permissions
/// instead of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Issue,
    PullRequest,
    Unknown,
}

/// Split an absolute path into its slash-delimited segments, dropping the
/// leading empty segment: `"/repos/o/r"` becomes `["repos", "o", "r"]`.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').skip(1).collect()
}

/// True when a segment consists entirely of ASCII digits.
pub(crate) fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_drops_leading_empty() {
        assert_eq!(path_segments("/repos/o/r"), vec!["repos", "o", "r"]);
        assert_eq!(path_segments("/"), vec![""]);
    }

    #[test]
    fn level_for_method() {
        assert_eq!(AccessLevel::for_method("GET"), AccessLevel::Read);
        assert_eq!(AccessLevel::for_method("POST"), AccessLevel::Write);
        assert_eq!(AccessLevel::for_method("DELETE"), AccessLevel::Write);
    }

    #[test]
    fn write_dominates_read() {
        assert!(AccessLevel::Write > AccessLevel::Read);
    }

    #[test]
    fn numeric_segments() {
        assert!(is_numeric("42"));
        assert!(!is_numeric("v1"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("4a"));
    }

    #[test]
    fn permission_serializes_kebab_case() {
        let json = serde_json::to_string(&Permission::PullRequests).unwrap();
        assert_eq!(json, "\"pull-requests\"");
        let json = serde_json::to_string(&Permission::IdToken).unwrap();
        assert_eq!(json, "\"id-token\"");
    }

    #[test]
    fn record_defaults() {
        let rec: RequestRecord =
            serde_json::from_str(r#"{"method":"GET","path":"/repos/o/r"}"#).unwrap();
        assert!(!rec.oidc);
        assert!(rec.query.is_none());
        assert!(rec.host.is_none());
    }
}
