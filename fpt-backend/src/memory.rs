//! In-memory asset database for tests and offline development.

use crate::database::AssetDatabase;
use crate::error::BackendError;
use crate::record::AssetRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An [`AssetDatabase`] backed by a plain map.
///
/// Records are stored whole; queries return the field projection the caller
/// asked for, like the real service. A query counter lets tests assert that
/// gated code paths make no backend calls at all.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    records: HashMap<(String, i64), AssetRecord>,
    queries: AtomicUsize,
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_type: &str, id: i64, record: AssetRecord) {
        self.records.insert((entity_type.to_string(), id), record);
    }

    /// Number of `find_one` calls made against this database.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl AssetDatabase for InMemoryDatabase {
    fn find_one(
        &self,
        entity_type: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<AssetRecord>, BackendError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .records
            .get(&(entity_type.to_string(), id))
            .map(|record| record.project(fields)))
    }
}
