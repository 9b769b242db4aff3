//! Generic permission rules derived from the structural shape of a path.
//!
//! Applied only when the pattern catalog has no match. Access level follows
//! the verb: GET reads, anything else writes. Confirmed-public repositories
//! need no token scope for plain reads, so those emit no grant at all.

use crate::github::Disambiguator;
use crate::model::{AccessLevel, Grant, IssueKind, Permission};

/// Resolve `(method, path segments, query)` into zero or more grants.
///
/// Returns the `unknown` sentinel when no structural rule applies; the
/// aggregator drops it, so unrecognized endpoints are excluded from the
/// manifest rather than flagged.
pub fn resolve(
    method: &str,
    segments: &[&str],
    query: Option<&str>,
    disambig: &mut Disambiguator,
) -> Vec<Grant> {
    let level = AccessLevel::for_method(method);
    let grant = |permission| vec![Grant::new(permission, level)];

    // Repo-scoped resources: /repos/{owner}/{repo}/{resource}/...
    if segments.len() >= 4 && segments[0] == "repos" {
        let (owner, repo, resource) = (segments[1], segments[2], segments[3]);
        let full_repo = format!("{}/{}", owner, repo);

        // Release asset downloads are served without any token scope.
        if resource == "releases" && segments.len() >= 5 && segments[4] == "download" {
            return vec![];
        }

        match resource {
            "actions" | "environments" => {
                if method == "GET" && disambig.is_public(&full_repo) {
                    return vec![];
                }
                return grant(Permission::Actions);
            }
            "check-runs" | "check-suites" => return grant(Permission::Checks),
            "releases" | "git" | "commits" => {
                if method == "GET" && disambig.is_public(&full_repo) {
                    return vec![];
                }
                return grant(Permission::Contents);
            }
            "deployments" => return grant(Permission::Deployments),
            "pages" => return grant(Permission::Pages),
            "pulls" => return grant(Permission::PullRequests),
            "projects" => return grant(Permission::RepositoryProjects),
            "code-scanning" => return grant(Permission::SecurityEvents),
            "statuses" => return grant(Permission::Statuses),
            "issues" if segments.len() >= 5 && crate::model::is_numeric(segments[4]) => {
                // Every pull request is also an issue, so the number alone
                // is ambiguous. Ask, and fall back to both grants.
                return match disambig.issue_kind(owner, repo, segments[4]) {
                    IssueKind::PullRequest => grant(Permission::PullRequests),
                    IssueKind::Issue => grant(Permission::Issues),
                    IssueKind::Unknown => vec![
                        Grant::new(Permission::Issues, level),
                        Grant::new(Permission::PullRequests, level),
                    ],
                };
            }
            _ => {}
        }
    }

    // Git smart-HTTP discovery: /{owner}/{repo}/info/refs?service=...
    if segments.len() >= 4 && segments[2] == "info" && segments[3] == "refs" {
        let repo = format!("{}/{}", segments[0], segments[1]);
        if let Some(service) = query.and_then(query_service) {
            match service.as_str() {
                "git-upload-pack" => {
                    if disambig.is_public(&repo) {
                        return vec![];
                    }
                    return vec![Grant::new(Permission::Contents, AccessLevel::Read)];
                }
                "git-receive-pack" => {
                    return vec![Grant::new(Permission::Contents, AccessLevel::Write)];
                }
                _ => {}
            }
        }
    }

    // Git smart-HTTP transfer: /{owner}/{repo}/git-upload-pack | git-receive-pack
    if segments.len() >= 3 {
        if segments[2] == "git-upload-pack" {
            let repo = format!("{}/{}", segments[0], segments[1]);
            if disambig.is_public(&repo) {
                return vec![];
            }
            return vec![Grant::new(Permission::Contents, AccessLevel::Read)];
        }
        if segments[2] == "git-receive-pack" {
            return vec![Grant::new(Permission::Contents, AccessLevel::Write)];
        }
    }

    // Release downloads addressed without the /repos prefix.
    if segments.len() >= 4 && segments[2] == "releases" && segments[3] == "download" {
        return vec![];
    }

    // Packages: /orgs/{org}/packages, /users/{user}/packages, /user/packages.
    if (segments.len() >= 3
        && (segments[0] == "orgs" || segments[0] == "users")
        && segments[2] == "packages")
        || (segments.len() >= 2 && segments[0] == "user" && segments[1] == "packages")
    {
        return grant(Permission::Packages);
    }

    // Top-level projects.
    if !segments.is_empty() && segments[0] == "projects" {
        return grant(Permission::RepositoryProjects);
    }

    // Bare repository metadata reads carry no scope.
    if segments.len() == 3 && segments[0] == "repos" && method == "GET" {
        return vec![];
    }

    // Likewise /repositories/{id} and /users/{name}.
    if segments.len() == 2
        && (segments[0] == "repositories" || segments[0] == "users")
        && method == "GET"
    {
        return vec![];
    }

    vec![Grant::unknown()]
}

/// Extract the `service` parameter from a raw query string.
fn query_service(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "service")
        .map(|(_, v)| v.into_owned())
}
