use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::msgs::{
    MsgAcknowledgement, MsgRecvPacket, MsgSendPacket, MsgTimeout, PacketMsg,
};
use ibc_eureka_core::channel::types::packet::{Packet, Payload};
use ibc_eureka_core::channel::types::timeout::TimeoutTimestamp;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::handler::types::msgs::{MsgEnvelope, MsgResponse};
use ibc_eureka_core::host::types::identifiers::ClientId;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Signer;
use tracing::debug;

use crate::context::MockContext;
use crate::fixtures::packet::{dummy_client_id, dummy_signer};
use crate::relayer::error::RelayerError;
use crate::testapp::clients::mock::mock_proof;

/// Two mock chains connected by a pair of mock light clients, and the
/// relayer operations that move packets between them.
///
/// Packets flow from chain A to chain B: A sends, B receives and
/// acknowledges, A processes the acknowledgement or the timeout.
#[derive(Debug)]
pub struct RelayerContext {
    ctx_a: MockContext,
    ctx_b: MockContext,
    /// The client on A tracking B.
    client_id_on_a: ClientId,
    /// The client on B tracking A.
    client_id_on_b: ClientId,
    signer: Signer,
}

impl RelayerContext {
    /// Registers each chain as the other's counterparty and syncs both
    /// clients.
    pub fn new(ctx_a: MockContext, ctx_b: MockContext) -> Self {
        let client_id_on_a = dummy_client_id(0);
        let client_id_on_b = dummy_client_id(1);

        let prefix_on_a = ctx_a.ibc_store.commitment_prefix.clone();
        let prefix_on_b = ctx_b.ibc_store.commitment_prefix.clone();

        let mut relayer = Self {
            ctx_a: ctx_a.with_counterparty(&client_id_on_a, client_id_on_b.clone(), prefix_on_b),
            ctx_b: ctx_b.with_counterparty(&client_id_on_b, client_id_on_a.clone(), prefix_on_a),
            client_id_on_a,
            client_id_on_b,
            signer: dummy_signer(),
        };

        relayer.update_client_on_a();
        relayer.update_client_on_b();

        relayer
    }

    pub fn get_ctx_a(&self) -> &MockContext {
        &self.ctx_a
    }

    pub fn get_ctx_b(&self) -> &MockContext {
        &self.ctx_b
    }

    pub fn get_ctx_a_mut(&mut self) -> &mut MockContext {
        &mut self.ctx_a
    }

    pub fn get_ctx_b_mut(&mut self) -> &mut MockContext {
        &mut self.ctx_b
    }

    pub fn client_id_on_a(&self) -> &ClientId {
        &self.client_id_on_a
    }

    pub fn client_id_on_b(&self) -> &ClientId {
        &self.client_id_on_b
    }

    /// Has the client on A learn B's latest state.
    pub fn update_client_on_a(&mut self) {
        let height = self.ctx_b.latest_height();
        self.ctx_a
            .ibc_store
            .clients
            .update_client(&self.client_id_on_a, height, self.ctx_b.consensus_state())
            .expect("client on A exists");
    }

    /// Has the client on B learn A's latest state.
    pub fn update_client_on_b(&mut self) {
        let height = self.ctx_a.latest_height();
        self.ctx_b
            .ibc_store
            .clients
            .update_client(&self.client_id_on_b, height, self.ctx_a.consensus_state())
            .expect("client on B exists");
    }

    /// Sends `payload` from A and returns the packet it committed to.
    pub fn send_packet_on_a(
        &mut self,
        payload: Payload,
        timeout_timestamp: TimeoutTimestamp,
    ) -> Result<Packet, RelayerError> {
        let msg = MsgSendPacket::new(
            self.client_id_on_a.clone(),
            timeout_timestamp,
            vec![payload],
            self.signer.clone(),
        );

        let emitted_before = self.ctx_a.ibc_store.events.len();
        self.ctx_a.deliver(envelope(msg))?;

        self.ctx_a.ibc_store.events[emitted_before..]
            .iter()
            .find_map(|event| match event {
                IbcEvent::SendPacket(event) => Some(event.packet().clone()),
                _ => None,
            })
            .ok_or_else(|| RelayerError::MissingEvent {
                description: "send_packet".to_string(),
            })
    }

    /// Relays `packet` to B, proving its commitment at A's latest height.
    pub fn recv_packet_on_b(&mut self, packet: Packet) -> Result<MsgResponse, RelayerError> {
        self.update_client_on_b();
        let proof_height = self.ctx_a.latest_height();

        debug!(sequence = %packet.sequence, %proof_height, "relaying packet to B");
        let msg = MsgRecvPacket::new(
            packet,
            mock_proof(&proof_height),
            proof_height,
            self.signer.clone(),
        );
        self.ctx_b.deliver(envelope(msg))
    }

    /// The acknowledgement B wrote for `packet`, if any.
    pub fn acknowledgement_on_b(&self, packet: &Packet) -> Result<Acknowledgement, RelayerError> {
        self.ctx_b
            .ibc_store
            .events
            .iter()
            .rev()
            .find_map(|event| match event {
                IbcEvent::WriteAcknowledgement(event)
                    if event.packet().sequence == packet.sequence
                        && event.packet().destination_client == packet.destination_client =>
                {
                    Some(event.acknowledgement().clone())
                }
                _ => None,
            })
            .ok_or_else(|| RelayerError::MissingEvent {
                description: format!("write_acknowledgement of packet `{}`", packet.sequence),
            })
    }

    /// Relays the acknowledgement of `packet` back to A.
    pub fn ack_packet_on_a(
        &mut self,
        packet: Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<MsgResponse, RelayerError> {
        self.update_client_on_a();
        let proof_height = self.ctx_b.latest_height();

        debug!(sequence = %packet.sequence, %proof_height, "relaying acknowledgement to A");
        let msg = MsgAcknowledgement::new(
            packet,
            acknowledgement,
            mock_proof(&proof_height),
            proof_height,
            self.signer.clone(),
        );
        self.ctx_a.deliver(envelope(msg))
    }

    /// Proves to A that B never received `packet`.
    pub fn timeout_packet_on_a(&mut self, packet: Packet) -> Result<MsgResponse, RelayerError> {
        self.update_client_on_a();
        let proof_height = self.ctx_b.latest_height();

        debug!(sequence = %packet.sequence, %proof_height, "relaying timeout to A");
        let msg = MsgTimeout::new(
            packet,
            mock_proof(&proof_height),
            proof_height,
            self.signer.clone(),
        );
        self.ctx_a.deliver(envelope(msg))
    }

    /// Runs a packet through its whole lifecycle: send on A, receive on B
    /// and acknowledge on A.
    pub fn relay_packet(
        &mut self,
        payload: Payload,
        timeout_timestamp: TimeoutTimestamp,
    ) -> Result<(Packet, Acknowledgement), RelayerError> {
        let packet = self.send_packet_on_a(payload, timeout_timestamp)?;
        self.recv_packet_on_b(packet.clone())?;
        let acknowledgement = self.acknowledgement_on_b(&packet)?;
        self.ack_packet_on_a(packet.clone(), acknowledgement.clone())?;
        Ok((packet, acknowledgement))
    }
}

fn envelope(msg: impl Into<PacketMsg>) -> MsgEnvelope {
    MsgEnvelope::from(msg.into())
}
