//! Events emitted while handling packet messages.

use ibc_eureka_core_channel_types::events::{
    AcknowledgePacket, ReceivePacket, SendPacket, TimeoutPacket, WriteAcknowledgement,
};
use ibc_eureka_core_router_types::event::ModuleEvent;
use ibc_primitives::prelude::*;

const MESSAGE_EVENT: &str = "message";
const MESSAGE_MODULE_ATTRIBUTE_KEY: &str = "module";
const CHANNEL_MODULE: &str = "ibc_channel";

/// Everything a host hears about from the packet core and its applications.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcEvent {
    SendPacket(SendPacket),
    ReceivePacket(ReceivePacket),
    WriteAcknowledgement(WriteAcknowledgement),
    AcknowledgePacket(AcknowledgePacket),
    TimeoutPacket(TimeoutPacket),
    /// Emitted by an application or middleware.
    Module(ModuleEvent),
    Message(MessageEvent),
}

impl IbcEvent {
    pub fn event_type(&self) -> &str {
        match self {
            Self::SendPacket(e) => e.event_type(),
            Self::ReceivePacket(e) => e.event_type(),
            Self::WriteAcknowledgement(e) => e.event_type(),
            Self::AcknowledgePacket(e) => e.event_type(),
            Self::TimeoutPacket(e) => e.event_type(),
            Self::Module(e) => e.kind.as_str(),
            Self::Message(_) => MESSAGE_EVENT,
        }
    }
}

/// Flattens an event into the key/value shape hosts forward to their event
/// sinks.
impl From<IbcEvent> for ModuleEvent {
    fn from(event: IbcEvent) -> Self {
        match event {
            IbcEvent::SendPacket(e) => e.into(),
            IbcEvent::ReceivePacket(e) => e.into(),
            IbcEvent::WriteAcknowledgement(e) => e.into(),
            IbcEvent::AcknowledgePacket(e) => e.into(),
            IbcEvent::TimeoutPacket(e) => e.into(),
            IbcEvent::Module(e) => e,
            IbcEvent::Message(e) => ModuleEvent::new(MESSAGE_EVENT)
                .with_attribute(MESSAGE_MODULE_ATTRIBUTE_KEY, e.module),
        }
    }
}

impl From<ModuleEvent> for IbcEvent {
    fn from(event: ModuleEvent) -> Self {
        Self::Module(event)
    }
}

/// The SDK-style `message` event relayers use to attribute a transaction
/// to the module that handled it.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvent {
    pub module: String,
}

impl MessageEvent {
    /// Attributes the message to the packet core.
    pub fn channel() -> Self {
        Self {
            module: CHANNEL_MODULE.to_owned(),
        }
    }
}

impl From<MessageEvent> for IbcEvent {
    fn from(event: MessageEvent) -> Self {
        Self::Message(event)
    }
}
