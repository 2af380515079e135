//! Entity reference strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity references handled by this manager are prefixed with this string,
/// e.g. `fpt://asset/PublishedFile/123`.
pub const REFERENCE_PREFIX: &str = "fpt://";

/// An opaque entity reference string.
///
/// A reference is transient: it is parsed fresh on every call and never
/// cached. Structural validity is only established by the parser in
/// `fpt-manager`; this newtype just guarantees we don't mix reference
/// strings up with other strings at API boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityReference(String);

impl EntityReference {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Composes a reference to a database record by its composite key.
    #[must_use]
    pub fn for_asset(entity_type: &str, id: i64) -> Self {
        Self(format!("{REFERENCE_PREFIX}asset/{entity_type}/{id}"))
    }

    /// Composes a workfile reference from a template name and its field
    /// values, in template key order.
    #[must_use]
    pub fn for_workfile(template_name: &str, field_values: &[String]) -> Self {
        Self(format!(
            "{REFERENCE_PREFIX}workfile/{template_name}/{}",
            field_values.join("/")
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fast prefix check, letting hosts skip generic string-sniffing.
    #[must_use]
    pub fn has_reference_prefix(&self) -> bool {
        self.0.starts_with(REFERENCE_PREFIX)
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityReference {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityReference {
    fn from(s: String) -> Self {
        Self(s)
    }
}
