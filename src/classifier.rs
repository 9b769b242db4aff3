//! Per-record orchestration: catalog, resolver, filter, disambiguation.

use crate::catalog::PatternCatalog;
use crate::filter::RepoFilter;
use crate::github::Disambiguator;
use crate::model::{path_segments, AccessLevel, Grant, Permission, RequestRecord};
use crate::resolver;

/// Classifies one observed request into zero, one, or two grants.
///
/// Owns the disambiguation caches: one classifier per analysis run, so
/// lookups made for one run never leak into another.
pub struct Classifier<'a> {
    catalog: &'a PatternCatalog,
    filter: RepoFilter,
    disambig: Disambiguator,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a PatternCatalog, filter: RepoFilter, disambig: Disambiguator) -> Self {
        Self {
            catalog,
            filter,
            disambig,
        }
    }

    /// Determine the permissions implied by one request.
    ///
    /// Order matters: the OIDC short-circuit first, then the repository
    /// filter, then the catalog, and the structural resolver last.
    pub fn classify(&mut self, record: &RequestRecord) -> Vec<Grant> {
        if record.oidc {
            return vec![Grant::new(Permission::IdToken, AccessLevel::Write)];
        }

        let segments = path_segments(&record.path);
        if !self.filter.in_scope(&segments) {
            tracing::debug!(path = %record.path, "request targets another repository, skipped");
            return vec![];
        }

        if let Some(target) = self.catalog.find(&record.method, &record.path) {
            return target.grants();
        }

        resolver::resolve(
            &record.method,
            &segments,
            record.query.as_deref(),
            &mut self.disambig,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::FakeProber;
    use crate::model::IssueKind;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn record(method: &str, path: &str) -> RequestRecord {
        RequestRecord {
            method: method.into(),
            path: path.into(),
            host: None,
            query: None,
            oidc: false,
        }
    }

    fn offline_classifier() -> Classifier<'static> {
        Classifier::new(
            PatternCatalog::builtin(),
            RepoFilter::new(None),
            Disambiguator::disabled(),
        )
    }

    #[test]
    fn oidc_short_circuits_everything() {
        let mut c = Classifier::new(
            PatternCatalog::builtin(),
            RepoFilter::new(Some("o/r".into())),
            Disambiguator::disabled(),
        );
        let mut rec = record("GET", "/repos/x/y/anything");
        rec.oidc = true;
        assert_eq!(
            c.classify(&rec),
            vec![Grant::new(Permission::IdToken, AccessLevel::Write)]
        );
    }

    #[test]
    fn filtered_request_produces_no_grants() {
        let mut c = Classifier::new(
            PatternCatalog::builtin(),
            RepoFilter::new(Some("o/r".into())),
            Disambiguator::disabled(),
        );
        assert!(c.classify(&record("GET", "/repos/x/y/issues")).is_empty());
    }

    #[test]
    fn catalog_takes_precedence_over_resolver() {
        // "pulls" would resolve to pull-requests generically, but the merge
        // endpoint is a catalog special case granting contents.
        let mut c = offline_classifier();
        assert_eq!(
            c.classify(&record("PUT", "/repos/o/r/pulls/5/merge")),
            vec![Grant::new(Permission::Contents, AccessLevel::Write)]
        );
    }

    #[test]
    fn falls_through_to_resolver() {
        let mut c = offline_classifier();
        assert_eq!(
            c.classify(&record("POST", "/repos/o/r/pulls")),
            vec![Grant::new(Permission::PullRequests, AccessLevel::Write)]
        );
    }

    #[test]
    fn unmatched_request_yields_sentinel() {
        let mut c = offline_classifier();
        assert_eq!(c.classify(&record("GET", "/rate_limit")), vec![Grant::unknown()]);
    }

    #[test]
    fn repeated_visibility_checks_probe_once() {
        let prober = FakeProber::new(Some(true), IssueKind::Unknown);
        let calls = Rc::clone(&prober.visibility_calls);
        let mut c = Classifier::new(
            PatternCatalog::builtin(),
            RepoFilter::new(None),
            Disambiguator::new(Some(Box::new(prober))),
        );
        assert!(c.classify(&record("GET", "/repos/o/r/commits/abc")).is_empty());
        assert!(c.classify(&record("GET", "/repos/o/r/releases")).is_empty());
        assert!(c.classify(&record("GET", "/repos/o/r/actions/runs")).is_empty());
        assert_eq!(calls.get(), 1);
    }
}
