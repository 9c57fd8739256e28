//! An in-memory [`KvStore`].
use alloc::collections::BTreeMap;

use ibc_eureka_core::host::store::{KvEntries, KvStore};
use ibc_eureka_core::host::types::error::HostError;
use ibc_eureka_core::primitives::prelude::*;

/// A sorted map of raw keys to raw values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Vec<u8>)> {
        self.entries.iter()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), HostError> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        self.entries.remove(key);
        Ok(())
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvEntries, HostError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
