//! Local artifact naming.
//!
//! The local copy of an object is named after the key's final `/` segment,
//! taken verbatim: `a/b/c` becomes `c`, a key with no `/` is used as is, and
//! `a/` yields the empty name. The pipeline refuses names it cannot create a
//! file under (empty, `.` and `..`) before the store is contacted.

use std::fmt;
use std::path::{Path, PathBuf};

use tally_types::ObjectKey;

use crate::error::ResolveError;

/// File name for the local artifact derived from an [`ObjectKey`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalName(String);

impl LocalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the artifact inside `dir`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.0)
    }
}

impl fmt::Display for LocalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the local artifact name for `key`.
pub fn resolve_local_name(key: &ObjectKey) -> Result<LocalName, ResolveError> {
    let name = key.last_segment();
    match name {
        "" => Err(ResolveError::EmptyName(key.clone())),
        "." | ".." => Err(ResolveError::ReservedName {
            key: key.clone(),
            name: name.to_string(),
        }),
        _ => Ok(LocalName(name.to_string())),
    }
}
