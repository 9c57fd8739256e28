//! Proof bytes carried by receive, acknowledgement and timeout messages.

use core::fmt::{Debug, Formatter, Result as FmtResult};

use ibc_primitives::prelude::*;
use subtle_encoding::hex;

use crate::error::CommitmentError;

/// A non-empty membership or non-membership proof.
///
/// The packet core never looks inside; the bytes are handed to the
/// light-client verifier of the counterparty client as they are.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, PartialEq, Eq)]
pub struct CommitmentProofBytes(
    #[cfg_attr(feature = "serde", serde(with = "ibc_primitives::serializers::hex_upper"))] Vec<u8>,
);

impl CommitmentProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CommitmentProofBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            return Err(CommitmentError::EmptyCommitmentProof);
        }
        Ok(Self(bytes))
    }
}

impl From<CommitmentProofBytes> for Vec<u8> {
    fn from(proof: CommitmentProofBytes) -> Self {
        proof.0
    }
}

impl Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let encoded = hex::encode_upper(&self.0);
        let encoded = core::str::from_utf8(&encoded).map_err(|_| core::fmt::Error)?;
        write!(f, "CommitmentProofBytes({encoded})")
    }
}
