use ibc_eureka_core_client_types::Height;
use ibc_eureka_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_primitives::Signer;

use super::validate_signer;
use crate::acknowledgement::Acknowledgement;
use crate::error::ChannelError;
use crate::packet::Packet;

/// Relays the acknowledgement written by the receiving chain back to the
/// sender.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgAcknowledgement {
    pub packet: Packet,
    pub acknowledgement: Acknowledgement,
    pub proof_acked: CommitmentProofBytes,
    pub proof_height: Height,
    pub signer: Signer,
}

impl MsgAcknowledgement {
    pub fn new(
        packet: Packet,
        acknowledgement: Acknowledgement,
        proof_acked: CommitmentProofBytes,
        proof_height: Height,
        signer: Signer,
    ) -> Self {
        Self {
            packet,
            acknowledgement,
            proof_acked,
            proof_height,
            signer,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.packet.validate_basic()?;
        self.acknowledgement.validate()?;
        validate_signer(&self.signer)
    }
}
