//! The interface an IBC Eureka application implements to receive packet
//! lifecycle callbacks.
use core::fmt::Debug;

use ibc_eureka_core_channel_types::packet::Payload;
use ibc_eureka_core_host::app::AppContext;
use ibc_eureka_core_host_types::identifiers::{ClientId, PortId, Sequence};
use ibc_eureka_core_router_types::error::ModuleError;
use ibc_eureka_core_router_types::module::{ModuleExtras, RecvPacketResult};
use ibc_primitives::prelude::*;
use ibc_primitives::Signer;

/// Application callbacks invoked by the packet core, once per payload.
///
/// Every callback runs against a branch of the application state. The core
/// merges the branch when the callback succeeds and discards it otherwise,
/// so an application never has to undo its own writes.
pub trait Module: Debug {
    /// Called while a packet is being sent. An error rejects the send.
    fn on_send_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        signer: &Signer,
    ) -> Result<ModuleExtras, ModuleError>;

    /// Called when a packet is received.
    ///
    /// Application-level failures are reported through
    /// [`RecvPacketResult::failure`]; the packet is still received and a
    /// failed acknowledgement is written. An `Err` aborts the whole message.
    fn on_recv_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<(ModuleExtras, RecvPacketResult), ModuleError>;

    /// Called with the acknowledgement the counterparty application wrote for
    /// `payload`, or the error acknowledgement sentinel if the receive failed.
    #[allow(clippy::too_many_arguments)]
    fn on_acknowledgement_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        acknowledgement: &[u8],
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError>;

    fn on_timeout_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError>;
}

/// Packet data that can expose the metadata middlewares read, without the
/// middleware knowing the application's encoding.
pub trait PacketDataProvider {
    /// The free-form JSON memo attached to the packet, if any.
    fn memo(&self) -> Option<&str>;

    /// The account that sent the packet on the source chain, if the
    /// application tracks one.
    fn packet_sender(&self, source_port: &PortId) -> Option<String>;
}

/// Capability of applications whose payloads can be decoded outside of
/// their own callbacks.
pub trait PacketDataUnmarshaler {
    type PacketData: PacketDataProvider;

    fn unmarshal_packet_data(&self, payload: &Payload) -> Result<Self::PacketData, ModuleError>;
}
