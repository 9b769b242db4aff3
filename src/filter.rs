//! Scoping of observed requests to the repository under analysis.

/// Decides whether a request targets the repository being analyzed.
///
/// Requests that clearly name a different repository are excluded. Paths
/// that reference a repository by opaque numeric id, or that do not follow
/// the `/repos/{owner}/{repo}` shape, cannot be confidently excluded and
/// are kept; the manifest may overcount but never under-reports.
pub struct RepoFilter {
    target: Option<String>,
}

impl RepoFilter {
    /// `target` is `"owner/repo"`; `None` makes the filter permissive.
    pub fn new(target: Option<String>) -> Self {
        Self { target }
    }

    pub fn in_scope(&self, segments: &[&str]) -> bool {
        let Some(target) = &self.target else {
            return true;
        };
        if segments.len() >= 3 && segments[0] == "repos" {
            let named = format!("{}/{}", segments[1], segments[2]);
            return named.eq_ignore_ascii_case(target);
        }
        // /repositories/{id} or any other shape: keep.
        true
    }
}
