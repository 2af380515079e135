//! Protocol vocabulary for the FPT asset-resolution manager.
//!
//! Defines the types every other crate in the workspace speaks in:
//! - [`EntityReference`] — opaque `fpt://` reference strings
//! - [`TraitsData`] / [`TraitSet`] — trait property bags and trait-id sets
//! - [`Access`] — the access mode requested for a batch operation
//! - [`BatchElementError`] — per-item failure values for batch callbacks
//!
//! These types carry no behavior beyond structural validation; parsing and
//! resolution live in `fpt-manager`.

mod access;
mod batch;
mod reference;
mod traits;

pub use access::Access;
pub use batch::{BatchElementError, ErrorCode};
pub use reference::{EntityReference, REFERENCE_PREFIX};
pub use traits::{trait_ids, trait_properties, trait_set, PropertyValue, TraitSet, TraitsData};
