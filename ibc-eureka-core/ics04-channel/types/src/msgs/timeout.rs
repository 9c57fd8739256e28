use ibc_eureka_core_client_types::Height;
use ibc_eureka_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_primitives::Signer;

use super::validate_signer;
use crate::error::ChannelError;
use crate::packet::Packet;

/// Proves to the sender that a packet was never received before its timeout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgTimeout {
    pub packet: Packet,
    pub proof_unreceived: CommitmentProofBytes,
    pub proof_height: Height,
    pub signer: Signer,
}

impl MsgTimeout {
    pub fn new(
        packet: Packet,
        proof_unreceived: CommitmentProofBytes,
        proof_height: Height,
        signer: Signer,
    ) -> Self {
        Self {
            packet,
            proof_unreceived,
            proof_height,
            signer,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.packet.validate_basic()?;
        validate_signer(&self.signer)
    }
}
