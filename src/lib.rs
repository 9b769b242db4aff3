//! actionscope — least-privilege permission advisor for GitHub Actions.
//!
//! Consumes a log of HTTP calls a workflow made with its token (as captured
//! by an interception proxy) and infers the minimal `permissions:` block the
//! workflow needed: each request maps to a named permission such as
//! `contents: write` or `issues: read`, and the per-request grants fold into
//! a single manifest suitable for least-privilege auditing.
//!
//! # Quick Start
//!
//! ```
//! use actionscope::{analyze, config::Config, input};
//!
//! let log = r#"[
//!     {"method": "GET", "path": "/repos/octo/hello/issues/42"},
//!     {"method": "POST", "path": "/repos/octo/hello/statuses/abc"}
//! ]"#;
//! let records = input::parse_records(log).unwrap();
//! let report = analyze(&records, &Config::default()).unwrap();
//! assert_eq!(report.manifest.len(), 3);
//! ```

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod github;
pub mod input;
pub mod manifest;
pub mod model;
pub mod output;
pub mod resolver;

use catalog::PatternCatalog;
use classifier::Classifier;
use config::Config;
use error::Result;
use filter::RepoFilter;
use github::{Disambiguator, HttpProber};
use manifest::PermissionManifest;
use model::RequestRecord;

/// Result of one analysis run: the aggregate manifest plus the requests no
/// rule recognized (excluded from the manifest, surfaced for diagnostics).
#[derive(Debug)]
pub struct AnalysisReport {
    pub manifest: PermissionManifest,
    pub unmatched: Vec<String>,
}

/// Classify every record and fold the grants into a manifest.
///
/// The disambiguation caches live inside this call: independent analyses
/// never share lookup state. Without a token in `config` the lookups are
/// skipped and classification takes the conservative branches (repositories
/// assumed private, issue identities ambiguous).
pub fn analyze(records: &[RequestRecord], config: &Config) -> Result<AnalysisReport> {
    let disambig = match &config.token {
        Some(token) => Disambiguator::new(Some(Box::new(HttpProber::new(
            config.api_url(),
            token,
        )?))),
        None => Disambiguator::disabled(),
    };

    let mut classifier = Classifier::new(
        PatternCatalog::builtin(),
        RepoFilter::new(config.repository.clone()),
        disambig,
    );

    let mut manifest = PermissionManifest::new();
    let mut unmatched: Vec<String> = Vec::new();

    for record in records {
        let grants = classifier.classify(record);
        if grants.iter().any(|g| g.is_unknown()) {
            let endpoint = format!("{} {}", record.method, record.path);
            tracing::debug!(%endpoint, "request matched no rule");
            if !unmatched.contains(&endpoint) {
                unmatched.push(endpoint);
            }
        }
        for grant in grants {
            manifest.record(grant);
        }
    }

    Ok(AnalysisReport {
        manifest,
        unmatched,
    })
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use model::{AccessLevel, Permission};
    use pretty_assertions::assert_eq;

    fn run(log: &str) -> AnalysisReport {
        let records = input::parse_records(log).unwrap();
        analyze(&records, &Config::default()).unwrap()
    }

    #[test]
    fn ambiguous_issue_without_credential_grants_both() {
        let report = run(r#"[{"method":"GET","path":"/repos/o/r/issues/42"}]"#);
        assert_eq!(report.manifest.get(Permission::Issues), Some(AccessLevel::Read));
        assert_eq!(
            report.manifest.get(Permission::PullRequests),
            Some(AccessLevel::Read)
        );
    }

    #[test]
    fn merge_special_case_grants_contents_write() {
        let report = run(r#"[{"method":"POST","path":"/repos/o/r/pulls/5/merge"}]"#);
        assert_eq!(report.manifest.len(), 1);
        assert_eq!(
            report.manifest.get(Permission::Contents),
            Some(AccessLevel::Write)
        );
    }

    #[test]
    fn release_download_requires_nothing() {
        let report = run(r#"[{"method":"GET","path":"/repos/o/r/releases/download/v1/asset.zip"}]"#);
        assert!(report.manifest.is_empty());
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn oidc_record_grants_id_token_regardless_of_path() {
        let report = run(r#"[{"oidc":true,"method":"GET","path":"/anything"}]"#);
        assert_eq!(report.manifest.len(), 1);
        assert_eq!(
            report.manifest.get(Permission::IdToken),
            Some(AccessLevel::Write)
        );
    }

    #[test]
    fn foreign_repository_contributes_nothing() {
        let records =
            input::parse_records(r#"[{"method":"GET","path":"/repos/x/y/issues"}]"#).unwrap();
        let config = Config {
            repository: Some("o/r".into()),
            ..Config::default()
        };
        let report = analyze(&records, &config).unwrap();
        assert!(report.manifest.is_empty());
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn write_dominates_across_records() {
        let report = run(
            r#"[{"method":"GET","path":"/repos/o/r/pulls"},
                {"method":"POST","path":"/repos/o/r/pulls"},
                {"method":"GET","path":"/repos/o/r/pulls"}]"#,
        );
        assert_eq!(
            report.manifest.get(Permission::PullRequests),
            Some(AccessLevel::Write)
        );
    }

    #[test]
    fn unmatched_endpoints_are_reported_once() {
        let report = run(
            r#"[{"method":"GET","path":"/rate_limit"},
                {"method":"GET","path":"/rate_limit"},
                {"method":"GET","path":"/repos/o/r/labels"}]"#,
        );
        assert_eq!(report.unmatched, vec!["GET /rate_limit".to_string()]);
        assert_eq!(report.manifest.get(Permission::Issues), Some(AccessLevel::Read));
    }

    #[test]
    fn mixed_log_produces_expected_manifest() {
        let report = run(
            r#"[{"method":"GET","path":"/repos/o/r"},
                {"method":"POST","path":"/repos/o/r/issues"},
                {"method":"GET","path":"/repos/o/r/commits/abc"},
                {"oidc":true,"method":"GET","path":"/token"}]"#,
        );
        assert_eq!(report.manifest.get(Permission::Issues), Some(AccessLevel::Write));
        assert_eq!(report.manifest.get(Permission::Contents), Some(AccessLevel::Read));
        assert_eq!(report.manifest.get(Permission::IdToken), Some(AccessLevel::Write));
        assert_eq!(report.manifest.len(), 3);
    }
}
