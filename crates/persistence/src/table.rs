// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! A keyed collection with per-record versions.
//!
//! Records keep insertion order for listing. Every successful write bumps
//! the record's version, which is what compare-and-swap checks against.

use crate::error::PersistenceError;
use crate::Versioned;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug)]
pub(crate) struct VersionedTable<K, V> {
    entity: &'static str,
    order: Vec<K>,
    rows: HashMap<K, Versioned<V>>,
}

impl<K, V> VersionedTable<K, V>
where
    K: Clone + Eq + Hash + Display,
    V: Clone,
{
    pub(crate) fn new(entity: &'static str) -> Self {
        Self {
            entity,
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Versioned<V>, PersistenceError> {
        if self.rows.contains_key(&key) {
            return Err(PersistenceError::DuplicateId {
                entity: self.entity,
                id: key.to_string(),
            });
        }
        let row: Versioned<V> = Versioned { version: 1, value };
        self.order.push(key.clone());
        self.rows.insert(key, row.clone());
        Ok(row)
    }

    pub(crate) fn get(&self, key: &K) -> Result<Versioned<V>, PersistenceError> {
        self.rows
            .get(key)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found(self.entity, key))
    }

    pub(crate) fn compare_and_swap(
        &mut self,
        key: &K,
        expected_version: u64,
        value: V,
    ) -> Result<Versioned<V>, PersistenceError> {
        let entity: &'static str = self.entity;
        let row: &mut Versioned<V> = self
            .rows
            .get_mut(key)
            .ok_or_else(|| PersistenceError::not_found(entity, key))?;

        if row.version != expected_version {
            return Err(PersistenceError::VersionConflict {
                entity,
                id: key.to_string(),
                expected: expected_version,
                actual: row.version,
            });
        }

        row.version += 1;
        row.value = value;
        Ok(row.clone())
    }

    /// Values in insertion order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.order
            .iter()
            .filter_map(|key| self.rows.get(key).map(|row| &row.value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_starts_at_version_one() {
        let mut table: VersionedTable<String, u32> = VersionedTable::new("widget");
        let row = table.insert(String::from("a"), 7).unwrap();
        assert_eq!(row, Versioned { version: 1, value: 7 });
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut table: VersionedTable<String, u32> = VersionedTable::new("widget");
        table.insert(String::from("a"), 7).unwrap();
        assert!(matches!(
            table.insert(String::from("a"), 8),
            Err(PersistenceError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_stale_swap_is_rejected_and_leaves_value() {
        let mut table: VersionedTable<String, u32> = VersionedTable::new("widget");
        let key: String = String::from("a");
        table.insert(key.clone(), 1).unwrap();

        let first = table.compare_and_swap(&key, 1, 2).unwrap();
        assert_eq!(first.version, 2);

        let stale = table.compare_and_swap(&key, 1, 3);
        assert_eq!(
            stale,
            Err(PersistenceError::VersionConflict {
                entity: "widget",
                id: key.clone(),
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(table.get(&key).unwrap().value, 2);
    }

    #[test]
    fn test_values_keep_insertion_order() {
        let mut table: VersionedTable<String, u32> = VersionedTable::new("widget");
        for (key, value) in [("z", 1), ("a", 2), ("m", 3)] {
            table.insert(String::from(key), value).unwrap();
        }
        assert_eq!(table.values().copied().collect::<Vec<u32>>(), vec![1, 2, 3]);
        assert_eq!(table.len(), 3);
    }
}
