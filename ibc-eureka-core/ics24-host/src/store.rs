//! Key-value store abstraction over the host's state.
use ibc_eureka_core_host_types::error::HostError;
use ibc_primitives::prelude::*;

/// Entries returned by [`KvStore::prefix_iter`].
pub type KvEntries = Vec<(Vec<u8>, Vec<u8>)>;

/// Minimal key-value store interface the packet core and applications write
/// through.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError>;

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), HostError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError>;

    fn has(&self, key: &[u8]) -> Result<bool, HostError> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns every entry whose key starts with `prefix`, in ascending key
    /// order.
    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvEntries, HostError>;
}
