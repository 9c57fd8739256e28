//! Application state as seen by application callbacks, and the branch
//! (copy-on-write view) the packet core runs those callbacks on.
use alloc::collections::BTreeMap;

use ibc_eureka_core_host_types::error::HostError;
use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;

use crate::gas::GasMeter;
use crate::store::{KvEntries, KvStore};

/// The slice of host state applications are allowed to touch.
///
/// Packet-core state (commitments, receipts, acknowledgements) is never
/// reachable through this context.
pub trait AppContext {
    fn store(&self) -> &dyn KvStore;

    fn store_mut(&mut self) -> &mut dyn KvStore;

    fn gas_meter(&self) -> &GasMeter;

    fn gas_meter_mut(&mut self) -> &mut GasMeter;

    fn host_timestamp(&self) -> Result<Timestamp, HostError>;
}

/// Pending writes of a branch; `None` marks a deletion.
pub type StoreWrites = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// A child view of an [`AppContext`] with its own write buffer and gas
/// meter.
///
/// Reads fall through to the parent; writes stay local until
/// [`BranchContext::commit`]. Dropping a branch, or calling
/// [`BranchContext::discard`], throws its writes away. Neither operation
/// charges the parent's gas meter; callers decide how much of
/// [`BranchContext::gas_consumed`] to charge.
pub struct BranchContext<'a> {
    parent: &'a mut dyn AppContext,
    writes: StoreWrites,
    gas_meter: GasMeter,
}

impl<'a> BranchContext<'a> {
    pub fn new(parent: &'a mut dyn AppContext, gas_limit: u64) -> Self {
        Self {
            parent,
            writes: StoreWrites::new(),
            gas_meter: GasMeter::new(gas_limit),
        }
    }

    /// Branches `parent` with whatever gas it has left.
    pub fn with_remaining_gas(parent: &'a mut dyn AppContext) -> Self {
        let gas_limit = parent.gas_meter().remaining();
        Self::new(parent, gas_limit)
    }

    pub fn gas_consumed(&self) -> u64 {
        self.gas_meter.consumed()
    }

    pub fn writes(&self) -> &StoreWrites {
        &self.writes
    }

    /// Merges the buffered writes into the parent and returns the gas the
    /// branch consumed.
    pub fn commit(self) -> Result<u64, HostError> {
        let consumed = self.gas_meter.consumed();
        let store = self.parent.store_mut();
        for (key, value) in self.writes {
            match value {
                Some(value) => store.set(key, value)?,
                None => store.delete(&key)?,
            }
        }
        Ok(consumed)
    }

    /// Drops the buffered writes and returns the gas the branch consumed.
    pub fn discard(self) -> u64 {
        self.gas_meter.consumed()
    }

    /// Returns the parent context, e.g. to charge gas to it.
    pub fn parent_mut(&mut self) -> &mut dyn AppContext {
        &mut *self.parent
    }
}

impl KvStore for BranchContext<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, HostError> {
        match self.writes.get(key) {
            Some(pending) => Ok(pending.clone()),
            None => self.parent.store().get(key),
        }
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), HostError> {
        self.writes.insert(key, Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), HostError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Result<KvEntries, HostError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.store().prefix_iter(prefix)?.into_iter().collect();

        for (key, pending) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match pending {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }

        Ok(merged.into_iter().collect())
    }
}

impl AppContext for BranchContext<'_> {
    fn store(&self) -> &dyn KvStore {
        self
    }

    fn store_mut(&mut self) -> &mut dyn KvStore {
        self
    }

    fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    fn gas_meter_mut(&mut self) -> &mut GasMeter {
        &mut self.gas_meter
    }

    fn host_timestamp(&self) -> Result<Timestamp, HostError> {
        self.parent.host_timestamp()
    }
}
