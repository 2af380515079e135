//! Trait sets and trait property bags.
//!
//! A "trait" is a named property group a host can request be populated on a
//! resolution result. [`TraitsData`] distinguishes a trait imbued with no
//! properties from a trait that is absent entirely — hosts use bare presence
//! for capability detection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Well-known trait identifiers understood by this manager.
pub mod trait_ids {
    pub const ENTITY: &str = "openassetio-mediacreation:usage.Entity";
    pub const LOCATABLE_CONTENT: &str = "openassetio-mediacreation:content.LocatableContent";
    pub const DISPLAY_NAME: &str = "openassetio-mediacreation:identity.DisplayName";
    pub const WORK: &str = "openassetio-mediacreation:application.Work";
    pub const FRAME_RANGED: &str = "openassetio-mediacreation:timeDomain.FrameRanged";
    pub const MANAGED: &str = "openassetio-mediacreation:managementPolicy.Managed";
    pub const IMAGE: &str = "openassetio-mediacreation:twoDimensional.Image";
    pub const GEOMETRY: &str = "openassetio-mediacreation:threeDimensional.Geometry";
}

/// Property keys within the traits above.
pub mod trait_properties {
    /// `LocatableContent` — a `file://` URL or backend-provided URL.
    pub const LOCATION: &str = "location";
    /// `DisplayName` — human-readable name.
    pub const NAME: &str = "name";
    /// `FrameRanged` — each independently optional.
    pub const START_FRAME: &str = "startFrame";
    pub const END_FRAME: &str = "endFrame";
    pub const IN_FRAME: &str = "inFrame";
    pub const OUT_FRAME: &str = "outFrame";
}

/// An unordered collection of trait identifiers. Membership testing is the
/// only operation callers need.
pub type TraitSet = BTreeSet<String>;

/// Convenience constructor for a [`TraitSet`] from literals.
#[must_use]
pub fn trait_set(ids: &[&str]) -> TraitSet {
    ids.iter().map(|s| (*s).to_string()).collect()
}

/// A single trait property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PropertyValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A bag of traits and their properties, keyed by trait identifier.
///
/// Imbuing a trait with no properties is meaningful: it declares "this
/// entity has this trait" without supplying any data for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitsData {
    traits: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

impl TraitsData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a trait as present, without setting any properties.
    pub fn imbue(&mut self, trait_id: &str) {
        self.traits.entry(trait_id.to_string()).or_default();
    }

    /// Sets a property on a trait, imbuing the trait if necessary.
    pub fn set_property(&mut self, trait_id: &str, property: &str, value: impl Into<PropertyValue>) {
        self.traits
            .entry(trait_id.to_string())
            .or_default()
            .insert(property.to_string(), value.into());
    }

    #[must_use]
    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    #[must_use]
    pub fn property(&self, trait_id: &str, property: &str) -> Option<&PropertyValue> {
        self.traits.get(trait_id)?.get(property)
    }

    /// The set of traits imbued on this bag.
    #[must_use]
    pub fn trait_set(&self) -> TraitSet {
        self.traits.keys().cloned().collect()
    }

    /// True if no trait at all is imbued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}
