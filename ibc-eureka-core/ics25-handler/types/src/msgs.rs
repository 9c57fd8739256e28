use ibc_eureka_core_channel_types::msgs::PacketMsg;
use ibc_eureka_core_host_types::identifiers::Sequence;

/// Enumeration of all messages that the local ICS26 module is capable of routing.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum MsgEnvelope {
    Packet(PacketMsg),
}

/// Outcome of a handled packet message.
///
/// A redundant relay is not an error: it is reported as `Noop` so that a
/// relayer's batch keeps going.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum ResponseResultType {
    #[display(fmt = "NOOP")]
    Noop,
    #[display(fmt = "SUCCESS")]
    Success,
    #[display(fmt = "FAILURE")]
    Failure,
}

/// Response returned by the entrypoints for a dispatched message.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MsgResponse {
    /// The sequence assigned to a sent packet.
    Send { sequence: Sequence },
    Recv(ResponseResultType),
    Ack(ResponseResultType),
    Timeout(ResponseResultType),
}

impl MsgResponse {
    pub fn result(&self) -> ResponseResultType {
        match self {
            MsgResponse::Send { .. } => ResponseResultType::Success,
            MsgResponse::Recv(result) | MsgResponse::Ack(result) | MsgResponse::Timeout(result) => {
                *result
            }
        }
    }
}
