//! Qualified unit names.
//!
//! A unit name is the globally unique, `::`-separated identifier under which
//! the host registers a loaded artifact (e.g. `Blog::Post`). Names are the
//! engine's currency: the registry, the removal guard and the host callbacks
//! all speak in [`UnitName`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Namespace separator in qualified names.
pub const SEPARATOR: &str = "::";

/// Qualified name of a loaded unit.
///
/// Cheap to clone (`Arc<str>` internally). Hashes and compares as its
/// string content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitName(Arc<str>);

impl UnitName {
    /// Create a name from its string form.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The name's string form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True iff `self` is `parent` plus exactly one more simple segment.
    ///
    /// `Blog::Post` is a direct child of `Blog`; `Blog::Post::Body` and
    /// `Blogger` are not. Used by nested-name cleanup to catch units that
    /// structural discovery misses.
    pub fn is_direct_child_of(&self, parent: &UnitName) -> bool {
        let Some(rest) = self.0.strip_prefix(parent.as_str()) else {
            return false;
        };
        let Some(simple) = rest.strip_prefix(SEPARATOR) else {
            return false;
        };
        !simple.is_empty() && !simple.contains(SEPARATOR)
    }

    /// Enclosing namespace, if the name is nested.
    pub fn parent(&self) -> Option<UnitName> {
        self.0.rfind(SEPARATOR).map(|idx| Self(Arc::from(&self.0[..idx])))
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for UnitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Tests
// =============================================================================
