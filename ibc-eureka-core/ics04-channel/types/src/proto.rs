//! Protobuf mirrors of the `ibc.core.channel.v2` messages used for event
//! encoding and for persisting packets awaiting an asynchronous
//! acknowledgement.
use core::str::FromStr;

use ibc_eureka_core_commitment_types::merkle::MerklePrefix;
use ibc_eureka_core_host_types::error::DecodingError;
use ibc_eureka_core_host_types::identifiers::{ClientId, PortId, Sequence};
use ibc_primitives::prelude::*;
use prost::Message;

use crate::acknowledgement::{error_acknowledgement, Acknowledgement};
use crate::packet::{Packet, Payload};
use crate::timeout::TimeoutTimestamp;
use crate::Counterparty;

#[derive(Clone, PartialEq, Message)]
pub struct RawPayload {
    #[prost(string, tag = "1")]
    pub source_port: String,
    #[prost(string, tag = "2")]
    pub destination_port: String,
    #[prost(string, tag = "3")]
    pub version: String,
    #[prost(string, tag = "4")]
    pub encoding: String,
    #[prost(bytes = "vec", tag = "5")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RawPacket {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(string, tag = "2")]
    pub source_client: String,
    #[prost(string, tag = "3")]
    pub destination_client: String,
    #[prost(uint64, tag = "4")]
    pub timeout_timestamp: u64,
    #[prost(message, repeated, tag = "5")]
    pub payloads: Vec<RawPayload>,
}

/// Wire form of an acknowledgement: a failed receive is the single error
/// acknowledgement.
#[derive(Clone, PartialEq, Message)]
pub struct RawAcknowledgement {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub app_acknowledgements: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct RawCounterparty {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub merkle_prefix: Vec<Vec<u8>>,
    #[prost(string, tag = "2")]
    pub client_id: String,
}

impl From<Payload> for RawPayload {
    fn from(payload: Payload) -> Self {
        Self {
            source_port: payload.source_port.to_string(),
            destination_port: payload.destination_port.to_string(),
            version: payload.version,
            encoding: payload.encoding,
            value: payload.value,
        }
    }
}

impl TryFrom<RawPayload> for Payload {
    type Error = DecodingError;

    fn try_from(raw: RawPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            source_port: PortId::from_str(&raw.source_port)?,
            destination_port: PortId::from_str(&raw.destination_port)?,
            version: raw.version,
            encoding: raw.encoding,
            value: raw.value,
        })
    }
}

impl From<Packet> for RawPacket {
    fn from(packet: Packet) -> Self {
        Self {
            sequence: packet.sequence.value(),
            source_client: packet.source_client.to_string(),
            destination_client: packet.destination_client.to_string(),
            timeout_timestamp: packet.timeout_timestamp.seconds(),
            payloads: packet.payloads.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<RawPacket> for Packet {
    type Error = DecodingError;

    fn try_from(raw: RawPacket) -> Result<Self, Self::Error> {
        if raw.payloads.is_empty() {
            return Err(DecodingError::missing_raw_data("packet payloads"));
        }

        Ok(Self {
            sequence: Sequence::from(raw.sequence),
            source_client: ClientId::from_str(&raw.source_client)?,
            destination_client: ClientId::from_str(&raw.destination_client)?,
            timeout_timestamp: TimeoutTimestamp::from_unix_seconds(raw.timeout_timestamp),
            payloads: raw
                .payloads
                .into_iter()
                .map(Payload::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl From<Acknowledgement> for RawAcknowledgement {
    fn from(ack: Acknowledgement) -> Self {
        let app_acknowledgements = if ack.recv_success {
            ack.app_acknowledgements
        } else {
            vec![error_acknowledgement().to_vec()]
        };
        Self {
            app_acknowledgements,
        }
    }
}

impl TryFrom<RawAcknowledgement> for Acknowledgement {
    type Error = DecodingError;

    fn try_from(raw: RawAcknowledgement) -> Result<Self, Self::Error> {
        let sentinel = error_acknowledgement();
        match raw.app_acknowledgements.as_slice() {
            [] => Err(DecodingError::missing_raw_data("app acknowledgements")),
            [only] if only.as_slice() == sentinel.as_slice() => Ok(Acknowledgement::failure()),
            _ => Ok(Acknowledgement::success(raw.app_acknowledgements)),
        }
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(counterparty: Counterparty) -> Self {
        Self {
            merkle_prefix: counterparty.merkle_path_prefix.key_path,
            client_id: counterparty.client_id.to_string(),
        }
    }
}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = DecodingError;

    fn try_from(raw: RawCounterparty) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: ClientId::from_str(&raw.client_id)?,
            merkle_path_prefix: MerklePrefix::new(raw.merkle_prefix),
        })
    }
}

/// Protobuf encoding of a domain type through its raw mirror.
pub trait EncodeRaw: Clone {
    type Raw: Message + From<Self>;

    fn encode_raw(&self) -> Vec<u8> {
        Self::Raw::from(self.clone()).encode_to_vec()
    }
}

/// Protobuf decoding of a domain type through its raw mirror.
pub trait DecodeRaw: Sized {
    type Raw: Message + Default + TryInto<Self, Error = DecodingError>;

    fn decode_raw(bytes: &[u8]) -> Result<Self, DecodingError> {
        Self::Raw::decode(bytes)?.try_into()
    }
}

macro_rules! raw_codec {
    ($domain:ty, $raw:ty) => {
        impl EncodeRaw for $domain {
            type Raw = $raw;
        }

        impl DecodeRaw for $domain {
            type Raw = $raw;
        }
    };
}

raw_codec!(Packet, RawPacket);
raw_codec!(Acknowledgement, RawAcknowledgement);
raw_codec!(Counterparty, RawCounterparty);
