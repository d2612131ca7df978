//! Region names hidden from the map.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Region hidden by default: there are no validators to place there.
pub const DEFAULT_HIDDEN_REGION: &str = "Antarctica";

/// A set of region names to drop before rendering.
///
/// Names that match no feature are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionExclusions {
    names: BTreeSet<String>,
}

impl Default for RegionExclusions {
    fn default() -> Self {
        Self::from_names([DEFAULT_HIDDEN_REGION])
    }
}

impl RegionExclusions {
    /// An exclusion set that hides nothing.
    pub fn none() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Order-independent hash of the set, used as a cache key.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.names.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hides_antarctica() {
        let exclusions = RegionExclusions::default();
        assert!(exclusions.contains("Antarctica"));
        assert!(!exclusions.contains("France"));
    }

    #[test]
    fn test_signature_ignores_insertion_order() {
        let a = RegionExclusions::from_names(["Antarctica", "Greenland"]);
        let b = RegionExclusions::from_names(["Greenland", "Antarctica"]);
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), RegionExclusions::none().signature());
    }
}
