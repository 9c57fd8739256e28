//! Message definitions for the IBC Eureka packet lifecycle.
use ibc_eureka_core_host_types::identifiers::PortId;
use ibc_primitives::Signer;

use crate::error::ChannelError;

mod acknowledgement;
mod recv_packet;
mod send_packet;
mod timeout;

pub use acknowledgement::*;
pub use recv_packet::*;
pub use send_packet::*;
pub use timeout::*;

/// All packet messages
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum PacketMsg {
    Send(MsgSendPacket),
    Recv(MsgRecvPacket),
    Ack(MsgAcknowledgement),
    Timeout(MsgTimeout),
}

impl PacketMsg {
    /// Port of the application that handles this message, if the message
    /// carries a payload.
    pub fn port_id(&self) -> Option<&PortId> {
        match self {
            PacketMsg::Send(msg) => msg.payloads.first().map(|p| &p.source_port),
            PacketMsg::Recv(msg) => msg.packet.payloads.first().map(|p| &p.destination_port),
            PacketMsg::Ack(msg) => msg.packet.payloads.first().map(|p| &p.source_port),
            PacketMsg::Timeout(msg) => msg.packet.payloads.first().map(|p| &p.source_port),
        }
    }
}

pub(crate) fn validate_signer(signer: &Signer) -> Result<(), ChannelError> {
    if signer.as_str().is_empty() {
        return Err(ChannelError::invalid_packet("message signer cannot be empty"));
    }
    Ok(())
}
