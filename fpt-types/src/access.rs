//! Access modes for batch operations.

use serde::{Deserialize, Serialize};

/// The access mode a host requests for a policy, introspection or resolve
/// call. This manager is read-only; every operation gates on [`Access::Read`]
/// before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    CreateRelated,
}

impl Access {
    #[must_use]
    pub fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }
}
