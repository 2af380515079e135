//! Mapping of requested trait sets to published-file-type filter names.
//!
//! Hosts presenting a browsing surface ask which backend file types are
//! relevant for a given trait set; this table answers. It is an ordered
//! linear scan, not a rule engine: most-specific entries first, first
//! subset match wins.

use fpt_types::{trait_ids, TraitSet};

// TODO(config): this mapping is site-specific and should eventually come
// from the settings file passed to initialize().
static FILTER_TABLE: &[(&[&str], &[&str])] = &[
    (
        &[trait_ids::WORK],
        &["Nuke Script", "Katana File", "Mari Archive", "Maya Scene"],
    ),
    (
        &[trait_ids::IMAGE],
        &["Rendered Image", "Render Image", "UDIM Image", "Movie"],
    ),
    (&[trait_ids::GEOMETRY], &["Alembic Cache", "Vdb File"]),
];

/// Returns the filter names for the first table entry whose required trait
/// set is a subset of `trait_set`, or `None` when nothing matches.
#[must_use]
pub fn filter_names_for(trait_set: &TraitSet) -> Option<&'static [&'static str]> {
    FILTER_TABLE
        .iter()
        .find(|(required, _)| required.iter().all(|t| trait_set.contains(*t)))
        .map(|(_, names)| *names)
}
