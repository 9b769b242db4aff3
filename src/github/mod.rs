//! Disambiguation lookups against the GitHub API.
//!
//! Two questions the request log alone cannot answer: is a repository
//! public (its reads need no token scope), and is an issue number actually
//! a pull request. Both are best-effort, one outbound call each, cached for
//! the lifetime of a single analysis run.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Result, ScopeError};
use crate::model::IssueKind;

/// Transport for the two disambiguation lookups. Injectable so the
/// classifier can be tested without network access.
pub trait Prober {
    /// Fetch repository visibility. `Some(true)` means confirmed public,
    /// `Some(false)` confirmed private or not accessible, `None` a
    /// transport failure.
    fn fetch_visibility(&self, repo: &str) -> Option<bool>;

    /// Fetch whether `owner/repo#number` is a pull request.
    fn fetch_issue_kind(&self, owner: &str, repo: &str, number: &str) -> IssueKind;
}

/// Caching front for a `Prober`, owned by one classifier for one run.
///
/// Visibility failures are folded to "private" before caching: on
/// uncertainty we assume the stricter permission requirement. Identity
/// failures stay `Unknown` (a transient error must not masquerade as a
/// stable "not a pull request"), but are still cached so the call is not
/// retried within the run.
pub struct Disambiguator {
    prober: Option<Box<dyn Prober>>,
    visibility: HashMap<String, bool>,
    issues: HashMap<String, IssueKind>,
}

impl Disambiguator {
    pub fn new(prober: Option<Box<dyn Prober>>) -> Self {
        Self {
            prober,
            visibility: HashMap::new(),
            issues: HashMap::new(),
        }
    }

    /// A disambiguator that never probes: every repository is treated as
    /// private, every issue identity as unknown.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Whether `owner/repo` (or a bare repository id) is public.
    pub fn is_public(&mut self, repo: &str) -> bool {
        if let Some(&public) = self.visibility.get(repo) {
            return public;
        }
        let Some(prober) = &self.prober else {
            return false;
        };
        let public = prober.fetch_visibility(repo).unwrap_or(false);
        tracing::debug!(repo, public, "resolved repository visibility");
        self.visibility.insert(repo.to_string(), public);
        public
    }

    /// Whether `owner/repo#number` is an issue or a pull request.
    pub fn issue_kind(&mut self, owner: &str, repo: &str, number: &str) -> IssueKind {
        let key = format!("{}/{}#{}", owner, repo, number);
        if let Some(&kind) = self.issues.get(&key) {
            return kind;
        }
        let Some(prober) = &self.prober else {
            return IssueKind::Unknown;
        };
        let kind = prober.fetch_issue_kind(owner, repo, number);
        tracing::debug!(key = %key, ?kind, "resolved issue identity");
        self.issues.insert(key, kind);
        kind
    }
}

/// Live prober calling the GitHub REST API with a bearer token.
pub struct HttpProber {
    http: reqwest::blocking::Client,
    api_url: String,
}

impl HttpProber {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ScopeError::Config("token contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, value);

        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct RepoMeta {
    #[serde(default = "default_private")]
    private: bool,
}

fn default_private() -> bool {
    true
}

impl Prober for HttpProber {
    fn fetch_visibility(&self, repo: &str) -> Option<bool> {
        // "owner/repo" uses the /repos form, a bare numeric id /repositories.
        let scope = if repo.contains('/') {
            "repos"
        } else {
            "repositories"
        };
        let url = format!("{}/{}/{}", self.api_url, scope, repo);
        match self.http.get(&url).send() {
            Ok(resp) if resp.status() == StatusCode::OK => {
                let private = resp.json::<RepoMeta>().map(|m| m.private).unwrap_or(true);
                Some(!private)
            }
            Ok(_) => Some(false),
            Err(e) => {
                tracing::warn!(repo, error = %e, "visibility lookup failed");
                None
            }
        }
    }

    fn fetch_issue_kind(&self, owner: &str, repo: &str, number: &str) -> IssueKind {
        let url = format!("{}/repos/{}/{}/pulls/{}", self.api_url, owner, repo, number);
        match self.http.get(&url).send() {
            Ok(resp) if resp.status() == StatusCode::OK => IssueKind::PullRequest,
            Ok(_) => IssueKind::Issue,
            Err(e) => {
                tracing::warn!(owner, repo, number, error = %e, "identity lookup failed");
                IssueKind::Unknown
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeProber;
    use super::*;
    use std::rc::Rc;

    #[test]
    fn disabled_assumes_private_and_unknown() {
        let mut d = Disambiguator::disabled();
        assert!(!d.is_public("o/r"));
        assert_eq!(d.issue_kind("o", "r", "1"), IssueKind::Unknown);
    }

    #[test]
    fn transport_failure_fails_closed_to_private() {
        let mut d = Disambiguator::new(Some(Box::new(FakeProber::new(
            None,
            IssueKind::Unknown,
        ))));
        assert!(!d.is_public("o/r"));
    }

    #[test]
    fn unknown_identity_is_cached_but_preserved() {
        let prober = FakeProber::new(Some(true), IssueKind::Unknown);
        let calls = Rc::clone(&prober.kind_calls);
        let mut d = Disambiguator::new(Some(Box::new(prober)));
        assert_eq!(d.issue_kind("o", "r", "7"), IssueKind::Unknown);
        assert_eq!(d.issue_kind("o", "r", "7"), IssueKind::Unknown);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn visibility_probed_once_per_repo() {
        let prober = FakeProber::new(Some(true), IssueKind::Issue);
        let calls = Rc::clone(&prober.visibility_calls);
        let mut d = Disambiguator::new(Some(Box::new(prober)));
        assert!(d.is_public("o/r"));
        assert!(d.is_public("o/r"));
        assert!(d.is_public("o/r"));
        assert_eq!(calls.get(), 1);
        // A different repository triggers its own probe.
        assert!(d.is_public("o/other"));
        assert_eq!(calls.get(), 2);
    }
}
