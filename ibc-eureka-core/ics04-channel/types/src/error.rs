//! Defines the packet lifecycle error type
use displaydoc::Display;
use ibc_eureka_core_client_types::error::ClientError;
use ibc_eureka_core_client_types::Status;
use ibc_eureka_core_host_types::error::{DecodingError, HostError, IdentifierError};
use ibc_eureka_core_host_types::identifiers::{ClientId, Sequence};
use ibc_eureka_core_router_types::error::{AbortSignal, ModuleError};
use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;

use crate::timeout::TimeoutTimestamp;

#[derive(Debug, Display)]
pub enum ChannelError {
    /// host error: `{0}`
    Host(HostError),
    /// client error: `{0}`
    Client(ClientError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// application module error: `{0}`
    Module(ModuleError),
    /// invalid packet: `{description}`
    InvalidPacket { description: String },
    /// invalid payload: `{description}`
    InvalidPayload { description: String },
    /// invalid acknowledgement: `{description}`
    InvalidAcknowledgement { description: String },
    /// invalid commitment: `{description}`
    InvalidCommitment { description: String },
    /// invalid timeout: `{description}`
    InvalidTimeout { description: String },
    /// counterparty not found for client `{0}`
    CounterpartyNotFound(ClientId),
    /// counterparty client `{expected}` does not match packet client `{actual}`
    InvalidChannelIdentifier { expected: ClientId, actual: ClientId },
    /// client `{client_id}` is not active; status is `{status}`
    ClientNotActive { client_id: ClientId, status: Status },
    /// packet commitment not found for client `{client_id}` and sequence `{sequence}`
    PacketCommitmentNotFound {
        client_id: ClientId,
        sequence: Sequence,
    },
    /// acknowledgement not found for client `{client_id}` and sequence `{sequence}`
    AcknowledgementNotFound {
        client_id: ClientId,
        sequence: Sequence,
    },
    /// acknowledgement already exists for client `{client_id}` and sequence `{sequence}`
    AcknowledgementExists {
        client_id: ClientId,
        sequence: Sequence,
    },
    /// async packet not found for client `{client_id}` and sequence `{sequence}`
    AsyncPacketNotFound {
        client_id: ClientId,
        sequence: Sequence,
    },
    /// timeout `{timeout}` elapsed at `{timestamp}`
    TimeoutElapsed {
        timeout: TimeoutTimestamp,
        timestamp: Timestamp,
    },
    /// timeout `{timeout}` not reached; proof timestamp is `{proof_timestamp}`
    TimeoutNotReached {
        timeout: TimeoutTimestamp,
        proof_timestamp: Timestamp,
    },
    /// failed proof verification for packet with sequence `{sequence}`: `{client_error}`
    FailedProofVerification {
        sequence: Sequence,
        client_error: ClientError,
    },
}

impl ChannelError {
    pub fn invalid_packet<T: ToString>(description: T) -> Self {
        Self::InvalidPacket {
            description: description.to_string(),
        }
    }

    pub fn invalid_payload<T: ToString>(description: T) -> Self {
        Self::InvalidPayload {
            description: description.to_string(),
        }
    }

    pub fn invalid_acknowledgement<T: ToString>(description: T) -> Self {
        Self::InvalidAcknowledgement {
            description: description.to_string(),
        }
    }

    pub fn invalid_commitment<T: ToString>(description: T) -> Self {
        Self::InvalidCommitment {
            description: description.to_string(),
        }
    }

    pub fn invalid_timeout<T: ToString>(description: T) -> Self {
        Self::InvalidTimeout {
            description: description.to_string(),
        }
    }

    /// Returns the abort signal raised by an application, if any.
    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        match self {
            Self::Module(e) => e.abort_signal(),
            _ => None,
        }
    }
}

impl From<HostError> for ChannelError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<ClientError> for ChannelError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<DecodingError> for ChannelError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ChannelError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

impl From<ModuleError> for ChannelError {
    fn from(e: ModuleError) -> Self {
        Self::Module(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::Module(e) => Some(e),
            Self::FailedProofVerification {
                client_error: e, ..
            } => Some(e),
            _ => None,
        }
    }
}
