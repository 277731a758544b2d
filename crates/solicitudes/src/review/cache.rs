use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::debug;

use super::scoring::ValidationResult;

/// Validation results keyed by record id, dropped whenever the underlying record list changes.
#[derive(Debug, Clone)]
pub struct ValidationCache<C> {
    fingerprint: Option<u64>,
    entries: HashMap<i64, ValidationResult<C>>,
}

impl<C> Default for ValidationCache<C> {
    fn default() -> Self {
        Self {
            fingerprint: None,
            entries: HashMap::new(),
        }
    }
}

pub fn fingerprint<T: Hash>(records: &[T]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.hash(&mut hasher);
    hasher.finish()
}

impl<C: Clone> ValidationCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the cache had to be invalidated.
    pub fn sync<T: Hash>(&mut self, records: &[T]) -> bool {
        let current = fingerprint(records);
        if self.fingerprint == Some(current) {
            return false;
        }

        let dropped = self.entries.len();
        self.entries.clear();
        self.fingerprint = Some(current);
        debug!(dropped, "record list changed, validation cache invalidated");
        true
    }

    pub fn get(&self, id: i64) -> Option<&ValidationResult<C>> {
        self.entries.get(&id)
    }

    pub fn get_or_compute<F>(&mut self, id: i64, compute: F) -> ValidationResult<C>
    where
        F: FnOnce() -> ValidationResult<C>,
    {
        self.entries.entry(id).or_insert_with(compute).clone()
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.fingerprint = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
