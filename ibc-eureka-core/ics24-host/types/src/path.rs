//! Defines the key layout under which IBC Eureka packet state is stored.
//!
//! Keys proven by the counterparty follow the `clientId ‖ tag ‖ be(sequence)`
//! layout, with the one-byte tags below. Keys that are only read locally
//! (sequence counter, async packets and the counterparty binding) live under
//! string prefixes so that they never share a key range with the provable
//! state of a client.

use core::fmt::{Display, Error as FmtError, Formatter};

use derive_more::{Display as DeriveDisplay, From};
use ibc_primitives::prelude::*;

use crate::error::DecodingError;
use crate::identifiers::{ClientId, Sequence};

pub const PACKET_COMMITMENT_TAG: u8 = 1;
pub const PACKET_RECEIPT_TAG: u8 = 2;
pub const PACKET_ACK_TAG: u8 = 3;

pub const NEXT_SEQ_SEND_PREFIX: &str = "nextSequenceSend";
pub const ASYNC_PACKET_PREFIX: &str = "asyncPacket";
pub const COUNTERPARTY_PREFIX: &str = "counterparty";

const SEQUENCE_LEN: usize = 8;

/// Enumerates the packet-state key families that are keyed by
/// `(client, sequence)` and can be listed per client.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, DeriveDisplay)]
pub enum PacketStateKind {
    #[display(fmt = "commitments")]
    Commitment,
    #[display(fmt = "receipts")]
    Receipt,
    #[display(fmt = "acks")]
    Acknowledgement,
    #[display(fmt = "async_packets")]
    AsyncPacket,
}

impl PacketStateKind {
    /// The key prefix shared by every entry of this kind for `client_id`.
    pub fn prefix(&self, client_id: &ClientId) -> Vec<u8> {
        match self {
            Self::Commitment => tagged_prefix(client_id, PACKET_COMMITMENT_TAG),
            Self::Receipt => tagged_prefix(client_id, PACKET_RECEIPT_TAG),
            Self::Acknowledgement => tagged_prefix(client_id, PACKET_ACK_TAG),
            Self::AsyncPacket => format!("{ASYNC_PACKET_PREFIX}/{client_id}/").into_bytes(),
        }
    }

    /// Builds the full key of the entry `(client_id, sequence)`.
    pub fn key(&self, client_id: &ClientId, sequence: Sequence) -> Vec<u8> {
        let mut key = self.prefix(client_id);
        key.extend_from_slice(&sequence.to_be_bytes());
        key
    }
}

fn tagged_prefix(client_id: &ClientId, tag: u8) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(client_id.as_bytes().len() + 1 + SEQUENCE_LEN);
    prefix.extend_from_slice(client_id.as_bytes());
    prefix.push(tag);
    prefix
}

/// Recovers the sequence from a key produced by [`PacketStateKind::key`].
pub fn extract_sequence_from_key(key: &[u8], prefix: &[u8]) -> Result<Sequence, DecodingError> {
    let raw = key
        .strip_prefix(prefix)
        .ok_or_else(|| DecodingError::invalid_raw_data("key does not start with prefix"))?;

    let bytes: [u8; SEQUENCE_LEN] = raw.try_into().map_err(|_| {
        DecodingError::invalid_raw_data(format!(
            "sequence suffix must be {SEQUENCE_LEN} bytes, got {}",
            raw.len()
        ))
    })?;

    Ok(Sequence::from_be_bytes(bytes))
}

/// Paths of every piece of state owned by the packet core.
#[derive(Clone, Debug, PartialEq, Eq, Hash, From)]
pub enum Path {
    Commitment(CommitmentPath),
    Receipt(ReceiptPath),
    Ack(AckPath),
    AsyncPacket(AsyncPacketPath),
    SeqSend(SeqSendPath),
    Counterparty(CounterpartyPath),
}

impl Path {
    /// The store key of this path.
    pub fn to_key(&self) -> Vec<u8> {
        match self {
            Self::Commitment(p) => p.to_key(),
            Self::Receipt(p) => p.to_key(),
            Self::Ack(p) => p.to_key(),
            Self::AsyncPacket(p) => p.to_key(),
            Self::SeqSend(p) => p.to_key(),
            Self::Counterparty(p) => p.to_key(),
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Commitment(p) => write!(f, "{p}"),
            Self::Receipt(p) => write!(f, "{p}"),
            Self::Ack(p) => write!(f, "{p}"),
            Self::AsyncPacket(p) => write!(f, "{p}"),
            Self::SeqSend(p) => write!(f, "{p}"),
            Self::Counterparty(p) => write!(f, "{p}"),
        }
    }
}

macro_rules! packet_path {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            pub client_id: ClientId,
            pub sequence: Sequence,
        }

        impl $name {
            pub fn new(client_id: &ClientId, sequence: Sequence) -> Self {
                Self {
                    client_id: client_id.clone(),
                    sequence,
                }
            }

            /// Prefix shared by all entries of the same client.
            pub fn prefix(client_id: &ClientId) -> Vec<u8> {
                $kind.prefix(client_id)
            }

            pub fn to_key(&self) -> Vec<u8> {
                $kind.key(&self.client_id, self.sequence)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
                write!(f, "{}/{}/{}", $kind, self.client_id, self.sequence)
            }
        }
    };
}

packet_path!(
    /// Send commitment of `(source client, sequence)`.
    CommitmentPath,
    PacketStateKind::Commitment
);
packet_path!(
    /// Receipt of `(destination client, sequence)`.
    ReceiptPath,
    PacketStateKind::Receipt
);
packet_path!(
    /// Acknowledgement commitment of `(destination client, sequence)`.
    AckPath,
    PacketStateKind::Acknowledgement
);
packet_path!(
    /// Packet awaiting an asynchronous acknowledgement.
    AsyncPacketPath,
    PacketStateKind::AsyncPacket
);

/// Next send sequence of a source client.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqSendPath(pub ClientId);

impl SeqSendPath {
    pub fn new(client_id: &ClientId) -> Self {
        Self(client_id.clone())
    }

    pub fn to_key(&self) -> Vec<u8> {
        format!("{self}").into_bytes()
    }
}

impl Display for SeqSendPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{NEXT_SEQ_SEND_PREFIX}/{}", self.0)
    }
}

/// Counterparty binding of a client.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CounterpartyPath(pub ClientId);

impl CounterpartyPath {
    pub fn new(client_id: &ClientId) -> Self {
        Self(client_id.clone())
    }

    pub fn to_key(&self) -> Vec<u8> {
        format!("{self}").into_bytes()
    }
}

impl Display for CounterpartyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{COUNTERPARTY_PREFIX}/{}", self.0)
    }
}
