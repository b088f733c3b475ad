use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of a remote container (a "bucket" in object-store terms).
///
/// The only invariant is non-emptiness. Whether the name is acceptable to a
/// particular backend is decided by that backend.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a container identifier, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::EmptyContainer);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContainerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContainerId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

/// Key naming an object inside a container.
///
/// Keys are path-like: `/`-delimited segments, where the final segment is
/// the natural name for a local copy of the object. Malformed keys (empty
/// segments, traversal components) are accepted here and rejected by the
/// store that cannot address them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create an object key, rejecting the empty string.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-delimited segments, empty ones included.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The final `/`-delimited segment, verbatim.
    ///
    /// A key with no `/` is its own last segment. A key ending in `/` has an
    /// empty last segment.
    pub fn last_segment(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_container_is_rejected() {
        assert_eq!(ContainerId::new(""), Err(TypeError::EmptyContainer));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(ObjectKey::new(""), Err(TypeError::EmptyKey));
    }

    #[test]
    fn container_display_is_verbatim() {
        let c = ContainerId::new("my-bucket").unwrap();
        assert_eq!(c.to_string(), "my-bucket");
        assert_eq!(c.as_str(), "my-bucket");
    }

    #[test]
    fn last_segment_of_nested_key() {
        let key = ObjectKey::new("a/b/c").unwrap();
        assert_eq!(key.last_segment(), "c");
    }

    #[test]
    fn last_segment_without_slash() {
        let key = ObjectKey::new("onlyname").unwrap();
        assert_eq!(key.last_segment(), "onlyname");
    }

    #[test]
    fn last_segment_with_trailing_slash_is_empty() {
        let key = ObjectKey::new("a/").unwrap();
        assert_eq!(key.last_segment(), "");
    }

    #[test]
    fn segments_keep_empty_components() {
        let key = ObjectKey::new("a//b").unwrap();
        let segs: Vec<_> = key.segments().collect();
        assert_eq!(segs, vec!["a", "", "b"]);
    }

    #[test]
    fn parse_from_str() {
        let key: ObjectKey = "counters/visits.txt".parse().unwrap();
        assert_eq!(key.as_str(), "counters/visits.txt");
        assert!("".parse::<ContainerId>().is_err());
    }

    #[test]
    fn serde_roundtrip_goes_through_validation() {
        let key = ObjectKey::new("x/y").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"x/y\"");
        let parsed: ObjectKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);

        assert!(serde_json::from_str::<ObjectKey>("\"\"").is_err());
        assert!(serde_json::from_str::<ContainerId>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn last_segment_never_contains_slash(s in "[a-z/]{1,24}") {
            let key = ObjectKey::new(s.clone()).unwrap();
            prop_assert!(!key.last_segment().contains('/'));
            prop_assert!(s.ends_with(key.last_segment()));
        }

        #[test]
        fn last_segment_matches_final_split(s in "[a-z0-9./]{1,24}") {
            let key = ObjectKey::new(s.clone()).unwrap();
            prop_assert_eq!(Some(key.last_segment()), key.segments().last());
        }
    }
}
