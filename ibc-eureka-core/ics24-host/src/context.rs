use core::time::Duration;

use ibc_eureka_core_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_eureka_core_channel_types::packet::{Packet, PacketState, Receipt};
use ibc_eureka_core_channel_types::timeout::MAX_TIMEOUT_DELTA;
use ibc_eureka_core_channel_types::Counterparty;
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::IbcEvent;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_host_types::identifiers::{ClientId, Sequence};
use ibc_eureka_core_host_types::path::{
    AckPath, AsyncPacketPath, CommitmentPath, CounterpartyPath, PacketStateKind, ReceiptPath,
    SeqSendPath,
};
use ibc_primitives::prelude::*;
use ibc_primitives::{Signer, Timestamp};

use crate::app::AppContext;

/// Context to be implemented by the host that provides all "read-only" methods.
///
/// Trait used for the top-level `validate` entrypoint in the
/// `ibc-eureka-core` crate. Getters return `Ok(None)` for absent state; an
/// `Err` means the host failed to read or decode what it stored.
pub trait ValidationContext {
    type V: ClientValidationContext;

    /// Retrieve the context that implements the light-client verifier.
    fn get_client_validation_context(&self) -> &Self::V;

    /// Returns the current block time of the local chain.
    fn host_timestamp(&self) -> Result<Timestamp, HostError>;

    /// Returns the counterparty bound to the local `client_id`.
    fn counterparty(&self, path: &CounterpartyPath) -> Result<Option<Counterparty>, HostError>;

    /// Returns the next sequence to assign on send; `None` until the first
    /// packet is sent through the client.
    fn get_next_sequence_send(&self, path: &SeqSendPath) -> Result<Option<Sequence>, HostError>;

    fn get_packet_commitment(
        &self,
        path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, HostError>;

    fn get_packet_receipt(&self, path: &ReceiptPath) -> Result<Option<Receipt>, HostError>;

    fn get_packet_acknowledgement(
        &self,
        path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, HostError>;

    /// Returns the packet stored while its acknowledgement is pending.
    fn get_async_packet(&self, path: &AsyncPacketPath) -> Result<Option<Packet>, HostError>;

    /// Lists every stored entry of `kind` for `client_id`, by ascending
    /// sequence.
    fn packet_states(
        &self,
        kind: PacketStateKind,
        client_id: &ClientId,
    ) -> Result<Vec<PacketState>, HostError>;

    /// How far in the future a send timeout may lie.
    fn max_timeout_delta(&self) -> Duration {
        MAX_TIMEOUT_DELTA
    }

    /// Validates the `signer` field of IBC messages, which represents the address
    /// of the user/relayer that signed the given message.
    fn validate_message_signer(&self, signer: &Signer) -> Result<(), HostError>;
}

/// Context to be implemented by the host that provides all "write-only" methods.
///
/// Trait used for the top-level `execute` and `dispatch` entrypoints in the
/// `ibc-eureka-core` crate.
pub trait ExecutionContext: ValidationContext {
    /// Returns the application state applications run their callbacks
    /// against. It must not expose the packet-core state.
    fn app_context_mut(&mut self) -> &mut dyn AppContext;

    /// Binds the local `client_id` to its counterparty.
    fn store_counterparty(
        &mut self,
        path: &CounterpartyPath,
        counterparty: Counterparty,
    ) -> Result<(), HostError>;

    fn store_next_sequence_send(
        &mut self,
        path: &SeqSendPath,
        sequence: Sequence,
    ) -> Result<(), HostError>;

    fn store_packet_commitment(
        &mut self,
        path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), HostError>;

    fn delete_packet_commitment(&mut self, path: &CommitmentPath) -> Result<(), HostError>;

    fn store_packet_receipt(&mut self, path: &ReceiptPath, receipt: Receipt)
        -> Result<(), HostError>;

    fn store_packet_acknowledgement(
        &mut self,
        path: &AckPath,
        commitment: AcknowledgementCommitment,
    ) -> Result<(), HostError>;

    /// Keeps `packet` until its acknowledgement is written asynchronously.
    fn store_async_packet(&mut self, path: &AsyncPacketPath, packet: Packet)
        -> Result<(), HostError>;

    fn delete_async_packet(&mut self, path: &AsyncPacketPath) -> Result<(), HostError>;

    /// Emit the given IBC event
    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), HostError>;

    /// Log the given message.
    fn log_message(&mut self, message: String) -> Result<(), HostError>;
}
