//! Defines the client error type

use displaydoc::Display;
use ibc_eureka_core_commitment_types::error::CommitmentError;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_host_types::identifiers::ClientId;
use ibc_primitives::prelude::*;

use crate::height::Height;

/// Encodes all the possible client errors
#[derive(Debug, Display)]
pub enum ClientError {
    /// host error: `{0}`
    Host(HostError),
    /// commitment error: `{0}`
    Commitment(CommitmentError),
    /// client `{0}` not found
    ClientNotFound(ClientId),
    /// invalid height; cannot be zero or negative
    InvalidHeight,
    /// missing consensus state for client `{client_id}` at height `{height}`
    MissingConsensusState { client_id: ClientId, height: Height },
    /// failed to verify membership: `{description}`
    FailedMembershipVerification { description: String },
    /// failed to verify non-membership: `{description}`
    FailedNonMembershipVerification { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl From<HostError> for ClientError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<CommitmentError> for ClientError {
    fn from(e: CommitmentError) -> Self {
        Self::Commitment(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::Commitment(e) => Some(e),
            _ => None,
        }
    }
}
