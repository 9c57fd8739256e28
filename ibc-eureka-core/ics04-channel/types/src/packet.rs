//! Defines the packet type and its payloads.
use ibc_eureka_core_host_types::identifiers::{ClientId, PortId, Sequence};
use ibc_primitives::prelude::*;

use crate::error::ChannelError;
use crate::timeout::TimeoutTimestamp;

/// Upper bound on the total size of payload values carried by one packet.
pub const MAX_PAYLOAD_SIZE: usize = 256 * 1024;

/// Application data routed from a source port to a destination port.
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
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Payload {
    pub source_port: PortId,
    pub destination_port: PortId,
    pub version: String,
    pub encoding: String,
    #[cfg_attr(
        feature = "serde",
        serde(with = "ibc_primitives::serializers::hex_upper")
    )]
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub value: Vec<u8>,
}

impl Payload {
    pub fn new(
        source_port: PortId,
        destination_port: PortId,
        version: impl Into<String>,
        encoding: impl Into<String>,
        value: Vec<u8>,
    ) -> Self {
        Self {
            source_port,
            destination_port,
            version: version.into(),
            encoding: encoding.into(),
            value,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.source_port
            .validate()
            .map_err(|e| ChannelError::invalid_payload(format!("source port: {e}")))?;
        self.destination_port
            .validate()
            .map_err(|e| ChannelError::invalid_payload(format!("destination port: {e}")))?;

        if self.version.trim().is_empty() {
            return Err(ChannelError::invalid_payload("version cannot be empty"));
        }
        if self.encoding.trim().is_empty() {
            return Err(ChannelError::invalid_payload("encoding cannot be empty"));
        }
        if self.value.is_empty() {
            return Err(ChannelError::invalid_payload("value cannot be empty"));
        }

        Ok(())
    }
}

/// A packet as sent from `source_client` to `destination_client`.
///
/// Both identifiers name light clients: `source_client` lives on the sending
/// chain and tracks the receiver, `destination_client` lives on the receiving
/// chain and tracks the sender.
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
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Packet {
    pub sequence: Sequence,
    pub source_client: ClientId,
    pub destination_client: ClientId,
    pub timeout_timestamp: TimeoutTimestamp,
    pub payloads: Vec<Payload>,
}

impl Packet {
    pub fn new(
        sequence: Sequence,
        source_client: ClientId,
        destination_client: ClientId,
        timeout_timestamp: TimeoutTimestamp,
        payloads: Vec<Payload>,
    ) -> Self {
        Self {
            sequence,
            source_client,
            destination_client,
            timeout_timestamp,
            payloads,
        }
    }

    /// Stateless checks every packet must pass before touching the store.
    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        if self.payloads.len() != 1 {
            return Err(ChannelError::invalid_packet(format!(
                "packets must contain exactly one payload, got {}",
                self.payloads.len()
            )));
        }

        let mut total_size = 0usize;
        for payload in &self.payloads {
            payload.validate_basic()?;
            total_size = total_size.saturating_add(payload.value.len());
        }
        if total_size > MAX_PAYLOAD_SIZE {
            return Err(ChannelError::invalid_payload(format!(
                "payload values exceed {MAX_PAYLOAD_SIZE} bytes: {total_size}"
            )));
        }

        self.source_client
            .validate()
            .map_err(|e| ChannelError::invalid_packet(format!("source client: {e}")))?;
        self.destination_client
            .validate()
            .map_err(|e| ChannelError::invalid_packet(format!("destination client: {e}")))?;

        if self.sequence.is_zero() {
            return Err(ChannelError::invalid_packet("packet sequence cannot be 0"));
        }
        if self.timeout_timestamp.is_zero() {
            return Err(ChannelError::invalid_packet(
                "packet timeout timestamp cannot be 0",
            ));
        }

        Ok(())
    }
}

/// Marker stored under the receipt key once a packet has been received.
///
/// Receipts are never deleted; their presence is what makes a second
/// delivery a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Receipt;

impl Receipt {
    pub const SENTINEL: [u8; 1] = [0x02];

    pub fn as_bytes(&self) -> &'static [u8] {
        &Self::SENTINEL
    }
}

/// A `(client, sequence, data)` entry of the packet store, as returned by
/// listings and carried in genesis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PacketState {
    pub client_id: ClientId,
    pub sequence: Sequence,
    #[cfg_attr(
        feature = "serde",
        serde(with = "ibc_primitives::serializers::hex_upper")
    )]
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub data: Vec<u8>,
}

impl PacketState {
    pub fn new(client_id: ClientId, sequence: Sequence, data: Vec<u8>) -> Self {
        Self {
            client_id,
            sequence,
            data,
        }
    }
}
