//! Aggregation of per-request grants into the final permission manifest.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::{AccessLevel, Grant, Permission};

/// The aggregate mapping from permission to the highest access level
/// observed. At most one entry per permission; entries keep the insertion
/// order of first appearance, which is what the JSON output shows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PermissionManifest {
    entries: Vec<(Permission, AccessLevel)>,
}

impl PermissionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one grant into the manifest. The `unknown` sentinel is
    /// discarded; a level is only ever raised, never downgraded.
    pub fn record(&mut self, grant: Grant) {
        if grant.is_unknown() {
            return;
        }
        match self
            .entries
            .iter_mut()
            .find(|(p, _)| *p == grant.permission)
        {
            Some((_, level)) => {
                if grant.level > *level {
                    *level = grant.level;
                }
            }
            None => self.entries.push((grant.permission, grant.level)),
        }
    }

    pub fn get(&self, permission: Permission) -> Option<AccessLevel> {
        self.entries
            .iter()
            .find(|(p, _)| *p == permission)
            .map(|(_, l)| *l)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Permission, AccessLevel)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Equality up to ordering, for order-independence checks.
    pub fn same_permissions(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(p, l)| other.get(p) == Some(l))
    }
}

impl Serialize for PermissionManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (permission, level) in &self.entries {
            map.serialize_entry(permission, level)?;
        }
        map.end()
    }
}

impl FromIterator<Grant> for PermissionManifest {
    fn from_iter<I: IntoIterator<Item = Grant>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for grant in iter {
            manifest.record(grant);
        }
        manifest
    }
}
