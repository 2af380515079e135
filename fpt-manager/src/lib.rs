//! Asset-resolution manager interface for Flow Production Tracking (FPT).
//!
//! Adapts the FPT production-tracking database and its path-template engine
//! to a standardized asset-resolution protocol. The manager recognises
//! `fpt://` entity references of two kinds:
//!
//! - `fpt://asset/{type}/{id}` — a database record, by composite key;
//! - `fpt://workfile/{template_name}/{field}/...` — an on-disk location,
//!   named by a path template plus positional field values.
//!
//! Operations come in batches and are per-item independent: one malformed or
//! missing reference never aborts the others. The manager is read-only and
//! synchronous; see [`FptManager`] for the threading contract.

mod error;
mod filters;
mod manager;
mod reference;

pub use error::ManagerError;
pub use filters::filter_names_for;
pub use manager::{Capability, FptManager, INFO_KEY_REFERENCE_PREFIX};
pub use reference::{parse_reference, ParsedReference};
