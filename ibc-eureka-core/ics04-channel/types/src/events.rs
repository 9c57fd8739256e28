//! Types for the IBC events emitted by the packet lifecycle handlers.
use ibc_eureka_core_router_types::event::{ModuleEvent, ModuleEventAttribute};
use ibc_primitives::prelude::*;
use subtle_encoding::hex;

use crate::acknowledgement::Acknowledgement;
use crate::packet::Packet;
use crate::proto::EncodeRaw;

pub const SEND_PACKET_EVENT: &str = "send_packet";
pub const RECV_PACKET_EVENT: &str = "recv_packet";
pub const WRITE_ACK_EVENT: &str = "write_acknowledgement";
pub const ACK_PACKET_EVENT: &str = "acknowledge_packet";
pub const TIMEOUT_EVENT: &str = "timeout_packet";

pub const PKT_SRC_CLIENT_ATTRIBUTE_KEY: &str = "packet_source_client";
pub const PKT_DST_CLIENT_ATTRIBUTE_KEY: &str = "packet_dest_client";
pub const PKT_SEQ_ATTRIBUTE_KEY: &str = "packet_sequence";
pub const PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "packet_timeout_timestamp";
pub const PKT_DATA_HEX_ATTRIBUTE_KEY: &str = "encoded_packet_hex";
pub const PKT_ACK_HEX_ATTRIBUTE_KEY: &str = "encoded_acknowledgement_hex";

fn encode_hex(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&hex::encode(bytes)).into_owned()
}

fn packet_attributes(packet: &Packet) -> Vec<ModuleEventAttribute> {
    vec![
        (PKT_SRC_CLIENT_ATTRIBUTE_KEY, &packet.source_client).into(),
        (PKT_DST_CLIENT_ATTRIBUTE_KEY, &packet.destination_client).into(),
        (PKT_SEQ_ATTRIBUTE_KEY, packet.sequence).into(),
        (
            PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
            packet.timeout_timestamp,
        )
            .into(),
        (PKT_DATA_HEX_ATTRIBUTE_KEY, encode_hex(&packet.encode_raw())).into(),
    ]
}

macro_rules! packet_event {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            packet: Packet,
        }

        impl $name {
            pub fn new(packet: Packet) -> Self {
                Self { packet }
            }

            pub fn packet(&self) -> &Packet {
                &self.packet
            }

            pub fn event_type(&self) -> &str {
                $kind
            }
        }

        impl From<$name> for ModuleEvent {
            fn from(event: $name) -> Self {
                ModuleEvent {
                    kind: $kind.to_string(),
                    attributes: packet_attributes(&event.packet),
                }
            }
        }
    };
}

packet_event!(
    /// Emitted when a packet commitment is written on the sending chain.
    SendPacket,
    SEND_PACKET_EVENT
);
packet_event!(
    /// Emitted when a packet is received, including redundant deliveries.
    ReceivePacket,
    RECV_PACKET_EVENT
);
packet_event!(
    /// Emitted when a packet commitment is cleared by an acknowledgement.
    AcknowledgePacket,
    ACK_PACKET_EVENT
);
packet_event!(
    /// Emitted when a packet commitment is cleared by a timeout.
    TimeoutPacket,
    TIMEOUT_EVENT
);

/// Emitted when an acknowledgement commitment is written on the receiving
/// chain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    packet: Packet,
    acknowledgement: Acknowledgement,
}

impl WriteAcknowledgement {
    pub fn new(packet: Packet, acknowledgement: Acknowledgement) -> Self {
        Self {
            packet,
            acknowledgement,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn acknowledgement(&self) -> &Acknowledgement {
        &self.acknowledgement
    }

    pub fn event_type(&self) -> &str {
        WRITE_ACK_EVENT
    }
}

impl From<WriteAcknowledgement> for ModuleEvent {
    fn from(event: WriteAcknowledgement) -> Self {
        let mut attributes = packet_attributes(&event.packet);
        attributes.push(
            (
                PKT_ACK_HEX_ATTRIBUTE_KEY,
                encode_hex(&event.acknowledgement.encode_raw()),
            )
                .into(),
        );
        ModuleEvent {
            kind: WRITE_ACK_EVENT.to_string(),
            attributes,
        }
    }
}
