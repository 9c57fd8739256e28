//! The commitment codec: binds a packet or an acknowledgement to the 32-byte
//! value stored under its provable key.
use core::fmt::{Debug, Formatter, Result as FmtResult};

use ibc_primitives::prelude::*;
use sha2::{Digest, Sha256};
use subtle_encoding::hex;

use crate::acknowledgement::Acknowledgement;
use crate::error::ChannelError;
use crate::packet::{Packet, Payload};

/// Version byte prefixed to every hashed commitment preimage.
const COMMITMENT_VERSION: u8 = 0x02;

const ACK_FAILURE: u8 = 0x00;
const ACK_SUCCESS: u8 = 0x01;

macro_rules! commitment_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            pub fn into_vec(self) -> Vec<u8> {
                self.0.to_vec()
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<Vec<u8>> for $name {
            type Error = ChannelError;

            fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
                let len = bytes.len();
                let array: [u8; 32] = bytes.try_into().map_err(|_| {
                    ChannelError::invalid_commitment(format!(
                        "{} must be 32 bytes, got {len}",
                        stringify!($name)
                    ))
                })?;
                Ok(Self(array))
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                let hex = hex::encode_upper(self.0);
                write!(f, "{}({})", stringify!($name), String::from_utf8_lossy(&hex))
            }
        }
    };
}

commitment_type!(
    /// Commitment to a sent packet, stored under the commitment key.
    PacketCommitment
);
commitment_type!(
    /// Commitment to an acknowledgement, stored under the acknowledgement key.
    AcknowledgementCommitment
);

fn sha256(bytes: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

fn hash_payload(payload: &Payload) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(sha256(payload.source_port.as_bytes()));
    hasher.update(sha256(payload.destination_port.as_bytes()));
    hasher.update(sha256(payload.version.as_bytes()));
    hasher.update(sha256(payload.encoding.as_bytes()));
    hasher.update(sha256(&payload.value));
    hasher.finalize().into()
}

/// Computes the value stored under the packet commitment key.
///
/// The sequence and source client are part of the key, not of the value.
pub fn compute_packet_commitment(packet: &Packet) -> PacketCommitment {
    let mut app_hasher = Sha256::new();
    for payload in &packet.payloads {
        app_hasher.update(hash_payload(payload));
    }
    let app_bytes: [u8; 32] = app_hasher.finalize().into();

    let mut hasher = Sha256::new();
    hasher.update([COMMITMENT_VERSION]);
    hasher.update(sha256(packet.destination_client.as_bytes()));
    hasher.update(sha256(packet.timeout_timestamp.seconds().to_be_bytes()));
    hasher.update(app_bytes);

    PacketCommitment(hasher.finalize().into())
}

/// Computes the value stored under the acknowledgement key.
pub fn compute_ack_commitment(ack: &Acknowledgement) -> AcknowledgementCommitment {
    let mut hasher = Sha256::new();
    hasher.update([COMMITMENT_VERSION]);

    if ack.recv_success {
        hasher.update([ACK_SUCCESS]);
        for app_ack in &ack.app_acknowledgements {
            hasher.update(sha256(app_ack));
        }
    } else {
        hasher.update([ACK_FAILURE]);
    }

    AcknowledgementCommitment(hasher.finalize().into())
}
