//! The IBC state of a mock host chain.
use alloc::collections::BTreeMap;
use core::time::Duration;

use ibc_eureka_core::channel::types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_eureka_core::channel::types::packet::{Packet, PacketState, Receipt};
use ibc_eureka_core::channel::types::timeout::MAX_TIMEOUT_DELTA;
use ibc_eureka_core::channel::types::Counterparty;
use ibc_eureka_core::client::types::Height;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::host::app::AppContext;
use ibc_eureka_core::host::gas::GasMeter;
use ibc_eureka_core::host::packet_store::PacketStore;
use ibc_eureka_core::host::store::KvStore;
use ibc_eureka_core::host::types::error::HostError;
use ibc_eureka_core::host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core::host::types::path::{
    AckPath, AsyncPacketPath, CommitmentPath, CounterpartyPath, PacketStateKind, ReceiptPath,
    SeqSendPath,
};
use ibc_eureka_core::host::{ExecutionContext, ValidationContext};
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::{Signer, Timestamp};
use tracing::debug;

use crate::store::InMemoryStore;
use crate::testapp::clients::mock::MockClients;

/// Application state of a mock host: the store applications write to and
/// the gas meter of the transaction being delivered.
#[derive(Clone, Debug)]
pub struct MockAppContext {
    pub store: InMemoryStore,
    pub gas_meter: GasMeter,
    pub host_timestamp: Timestamp,
}

impl MockAppContext {
    pub fn new(host_timestamp: Timestamp, gas_limit: u64) -> Self {
        Self {
            store: InMemoryStore::new(),
            gas_meter: GasMeter::new(gas_limit),
            host_timestamp,
        }
    }
}

impl AppContext for MockAppContext {
    fn store(&self) -> &dyn KvStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut dyn KvStore {
        &mut self.store
    }

    fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    fn gas_meter_mut(&mut self) -> &mut GasMeter {
        &mut self.gas_meter
    }

    fn host_timestamp(&self) -> Result<Timestamp, HostError> {
        Ok(self.host_timestamp)
    }
}

/// An object that stores all IBC related data of a mock host, together with
/// its light clients and application state.
#[derive(Clone, Debug)]
pub struct MockIbcStore {
    pub host_height: Height,
    pub host_timestamp: Timestamp,
    /// Key prefix under which the counterparty proves this host's packet
    /// state.
    pub commitment_prefix: Vec<u8>,
    pub max_timeout_delta: Duration,
    pub packet_store: PacketStore<InMemoryStore>,
    pub clients: MockClients,
    pub app: MockAppContext,
    pub events: Vec<IbcEvent>,
    pub logs: Vec<String>,
}

impl MockIbcStore {
    pub fn new(host_height: Height, host_timestamp: Timestamp, commitment_prefix: Vec<u8>) -> Self {
        Self {
            host_height,
            host_timestamp,
            commitment_prefix,
            max_timeout_delta: MAX_TIMEOUT_DELTA,
            packet_store: PacketStore::new(InMemoryStore::new()),
            clients: MockClients::default(),
            app: MockAppContext::new(host_timestamp, u64::MAX),
            events: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Moves the host to `height` at `timestamp`.
    pub fn set_host_block(&mut self, height: Height, timestamp: Timestamp) {
        self.host_height = height;
        self.host_timestamp = timestamp;
        self.app.host_timestamp = timestamp;
    }

    /// The packet state this host exposes to its counterparties, keyed as
    /// the counterparty's verifier looks it up.
    pub fn provable_state(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.packet_store
            .store()
            .iter()
            .map(|(key, value)| {
                let mut full_key = self.commitment_prefix.clone();
                full_key.extend_from_slice(key);
                (full_key, value.clone())
            })
            .collect()
    }
}

impl ValidationContext for MockIbcStore {
    type V = MockClients;

    fn get_client_validation_context(&self) -> &Self::V {
        &self.clients
    }

    fn host_timestamp(&self) -> Result<Timestamp, HostError> {
        Ok(self.host_timestamp)
    }

    fn counterparty(&self, path: &CounterpartyPath) -> Result<Option<Counterparty>, HostError> {
        self.packet_store.counterparty(path)
    }

    fn get_next_sequence_send(&self, path: &SeqSendPath) -> Result<Option<Sequence>, HostError> {
        self.packet_store.next_sequence_send(path)
    }

    fn get_packet_commitment(
        &self,
        path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, HostError> {
        self.packet_store.packet_commitment(path)
    }

    fn get_packet_receipt(&self, path: &ReceiptPath) -> Result<Option<Receipt>, HostError> {
        self.packet_store.packet_receipt(path)
    }

    fn get_packet_acknowledgement(
        &self,
        path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, HostError> {
        self.packet_store.packet_acknowledgement(path)
    }

    fn get_async_packet(&self, path: &AsyncPacketPath) -> Result<Option<Packet>, HostError> {
        self.packet_store.async_packet(path)
    }

    fn packet_states(
        &self,
        kind: PacketStateKind,
        client_id: &ClientId,
    ) -> Result<Vec<PacketState>, HostError> {
        self.packet_store.packet_states(kind, client_id)
    }

    fn max_timeout_delta(&self) -> Duration {
        self.max_timeout_delta
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), HostError> {
        if signer.is_blank() {
            return Err(HostError::UnauthorizedSigner {
                description: "signer cannot be blank".to_string(),
            });
        }
        Ok(())
    }
}

impl ExecutionContext for MockIbcStore {
    fn app_context_mut(&mut self) -> &mut dyn AppContext {
        &mut self.app
    }

    fn store_counterparty(
        &mut self,
        path: &CounterpartyPath,
        counterparty: Counterparty,
    ) -> Result<(), HostError> {
        self.packet_store.set_counterparty(path, &counterparty)
    }

    fn store_next_sequence_send(
        &mut self,
        path: &SeqSendPath,
        sequence: Sequence,
    ) -> Result<(), HostError> {
        self.packet_store.set_next_sequence_send(path, sequence)
    }

    fn store_packet_commitment(
        &mut self,
        path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), HostError> {
        self.packet_store.set_packet_commitment(path, commitment)
    }

    fn delete_packet_commitment(&mut self, path: &CommitmentPath) -> Result<(), HostError> {
        self.packet_store.delete_packet_commitment(path)
    }

    fn store_packet_receipt(
        &mut self,
        path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), HostError> {
        self.packet_store.set_packet_receipt(path, receipt)
    }

    fn store_packet_acknowledgement(
        &mut self,
        path: &AckPath,
        commitment: AcknowledgementCommitment,
    ) -> Result<(), HostError> {
        self.packet_store.set_packet_acknowledgement(path, commitment)
    }

    fn store_async_packet(
        &mut self,
        path: &AsyncPacketPath,
        packet: Packet,
    ) -> Result<(), HostError> {
        self.packet_store.set_async_packet(path, &packet)
    }

    fn delete_async_packet(&mut self, path: &AsyncPacketPath) -> Result<(), HostError> {
        self.packet_store.delete_async_packet(path)
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), HostError> {
        self.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), HostError> {
        debug!(%message, "ibc log");
        self.logs.push(message);
        Ok(())
    }
}
