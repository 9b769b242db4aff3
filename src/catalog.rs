//! Static catalog of endpoint patterns whose permission cannot be derived
//! from the generic path-shape rules.
//!
//! The catalog is data, not code: an inspectable list of
//! `(method, segment pattern) -> (permissions, level)` rules, so the matcher
//! can be unit-tested against arbitrary rule sets.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::{is_numeric, path_segments, AccessLevel, Grant, Permission};

/// One position in a path template: a fixed name or a variable slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Wildcard,
}

impl Segment {
    fn parse(s: &str) -> Self {
        if s.starts_with('{') {
            Self::Wildcard
        } else {
            Self::Literal(s.to_string())
        }
    }
}

/// What a matched rule grants. Two permissions model genuine API ambiguity
/// (an endpoint that serves both issues and pull requests).
#[derive(Debug, Clone)]
pub struct RuleTarget {
    pub permissions: Vec<Permission>,
    pub level: AccessLevel,
}

impl RuleTarget {
    pub fn grants(&self) -> Vec<Grant> {
        self.permissions
            .iter()
            .map(|&p| Grant::new(p, self.level))
            .collect()
    }
}

/// Catalog entry description, used by `list-rules` output.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescription {
    pub method: String,
    pub pattern: String,
    pub permissions: Vec<Permission>,
    pub level: AccessLevel,
}

/// Exact and wildcarded path templates mapped to permission grants.
pub struct PatternCatalog {
    rules: HashMap<(String, Vec<Segment>), RuleTarget>,
    // Entries in declaration order, for list-rules.
    order: Vec<(String, Vec<Segment>)>,
}

impl PatternCatalog {
    /// Build a catalog from `(method, template, permissions, level)` rows.
    /// Template segments written as `{placeholder}` become wildcards.
    pub fn from_rules(rows: &[(&str, &str, &[Permission], AccessLevel)]) -> Self {
        let mut rules = HashMap::new();
        let mut order = Vec::new();
        for &(method, template, permissions, level) in rows {
            let segments: Vec<Segment> = path_segments(template)
                .into_iter()
                .map(Segment::parse)
                .collect();
            let key = (method.to_string(), segments);
            order.push(key.clone());
            rules.insert(
                key,
                RuleTarget {
                    permissions: permissions.to_vec(),
                    level,
                },
            );
        }
        Self { rules, order }
    }

    /// The built-in catalog covering GitHub endpoints whose permission does
    /// not follow the `/repos/{owner}/{repo}/{resource}` convention.
    pub fn builtin() -> &'static Self {
        static BUILTIN: Lazy<PatternCatalog> = Lazy::new(|| PatternCatalog::from_rules(RULES));
        &BUILTIN
    }

    /// Find the most specific rule matching `(method, path)`.
    ///
    /// The path is split into segments; owner and repo positions of
    /// `/repos/{owner}/{repo}/...` shapes are normalized to wildcards, since
    /// every template is repo-scoped. Then candidates are probed with a
    /// widening wildcard window: at step `i`, a segment is wildcarded iff it
    /// lies within the trailing `i` positions and is entirely numeric. The
    /// first step that hits wins, so a literal match always beats a
    /// wildcarded one, and numeric-looking segments outside the trailing
    /// window (an account named "123", say) stay literal.
    pub fn find(&self, method: &str, path: &str) -> Option<&RuleTarget> {
        let raw = path_segments(path);
        let n = raw.len();

        let base: Vec<Segment> = raw
            .iter()
            .enumerate()
            .map(|(j, s)| {
                if raw[0] == "repos" && n >= 3 && (j == 1 || j == 2) {
                    Segment::Wildcard
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();

        for i in 0..=n {
            let candidate: Vec<Segment> = base
                .iter()
                .enumerate()
                .map(|(j, seg)| {
                    if j >= n - i && is_numeric(raw[j]) {
                        Segment::Wildcard
                    } else {
                        seg.clone()
                    }
                })
                .collect();
            if let Some(target) = self.rules.get(&(method.to_string(), candidate)) {
                return Some(target);
            }
        }
        None
    }

    /// Describe every rule in declaration order.
    pub fn describe(&self) -> Vec<RuleDescription> {
        self.order
            .iter()
            .map(|key| {
                let target = &self.rules[key];
                let pattern: String = key
                    .1
                    .iter()
                    .map(|seg| match seg {
                        Segment::Literal(s) => format!("/{}", s),
                        Segment::Wildcard => "/*".to_string(),
                    })
                    .collect();
                RuleDescription {
                    method: key.0.clone(),
                    pattern,
                    permissions: target.permissions.clone(),
                    level: target.level,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

use AccessLevel::{Read, Write};
use Permission::{Contents, Issues, PullRequests};

const BOTH: &[Permission] = &[Issues, PullRequests];

/// Endpoints that grant `contents`, unambiguous `issues` endpoints, and the
/// issue endpoints that are inherently ambiguous with pull requests.
#[rustfmt::skip]
const RULES: &[(&str, &str, &[Permission], AccessLevel)] = &[
    // Contents.
    ("GET",    "/repos/{owner}/{repo}/codeowners/errors",           &[Contents], Read),
    ("PUT",    "/repos/{owner}/{repo}/pulls/{n}/merge",             &[Contents], Write),
    ("POST",   "/repos/{owner}/{repo}/pulls/{n}/merge",             &[Contents], Write),
    ("PUT",    "/repos/{owner}/{repo}/pulls/{n}/update-branch",     &[Contents], Write),
    ("POST",   "/repos/{owner}/{repo}/pulls/{n}/update-branch",     &[Contents], Write),
    ("POST",   "/repos/{owner}/{repo}/comments/{n}/reactions",      &[Contents], Write),
    ("DELETE", "/repos/{owner}/{repo}/comments/{n}/reactions/{n}",  &[Contents], Write),
    ("GET",    "/repos/{owner}/{repo}/branches",                    &[Contents], Read),
    ("POST",   "/repos/{owner}/{repo}/merge-upstream",              &[Contents], Write),
    ("POST",   "/repos/{owner}/{repo}/merges",                      &[Contents], Write),
    ("PATCH",  "/repos/{owner}/{repo}/comments/{n}",                &[Contents], Write),
    ("DELETE", "/repos/{owner}/{repo}/comments/{n}",                &[Contents], Write),
    ("POST",   "/repos/{owner}/{repo}/dispatches",                  &[Contents], Write),

    // Issues (unambiguous).
    ("POST",   "/repos/{owner}/{repo}/issues",                      &[Issues], Write),
    ("GET",    "/repos/{owner}/{repo}/labels",                      &[Issues], Read),
    ("POST",   "/repos/{owner}/{repo}/labels",                      &[Issues], Write),
    ("GET",    "/repos/{owner}/{repo}/labels/{n}",                  &[Issues], Read),
    ("PATCH",  "/repos/{owner}/{repo}/labels/{n}",                  &[Issues], Write),
    ("DELETE", "/repos/{owner}/{repo}/labels/{n}",                  &[Issues], Write),
    ("GET",    "/repos/{owner}/{repo}/milestones",                  &[Issues], Read),
    ("POST",   "/repos/{owner}/{repo}/milestones",                  &[Issues], Write),
    ("GET",    "/repos/{owner}/{repo}/milestones/{n}",              &[Issues], Read),
    ("PATCH",  "/repos/{owner}/{repo}/milestones/{n}",              &[Issues], Write),
    ("DELETE", "/repos/{owner}/{repo}/milestones/{n}",              &[Issues], Write),
    ("GET",    "/repos/{owner}/{repo}/milestones/{n}/labels",       &[Issues], Read),

    // Issue endpoints that also cover pull requests: both grants.
    ("GET",    "/repos/{owner}/{repo}/issues",                      BOTH, Read),
    ("GET",    "/repos/{owner}/{repo}/issues/comments",             BOTH, Read),
    ("GET",    "/repos/{owner}/{repo}/issues/events",               BOTH, Read),
    ("GET",    "/repos/{owner}/{repo}/assignees",                   BOTH, Read),
];
