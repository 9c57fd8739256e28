use ibc_eureka_core_client_types::Height;
use ibc_eureka_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_primitives::Signer;

use super::validate_signer;
use crate::error::ChannelError;
use crate::packet::Packet;

/// Delivers a packet to the receiving chain, together with a proof that the
/// sending chain committed to it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecvPacket {
    pub packet: Packet,
    pub proof_commitment: CommitmentProofBytes,
    pub proof_height: Height,
    pub signer: Signer,
}

impl MsgRecvPacket {
    pub fn new(
        packet: Packet,
        proof_commitment: CommitmentProofBytes,
        proof_height: Height,
        signer: Signer,
    ) -> Self {
        Self {
            packet,
            proof_commitment,
            proof_height,
            signer,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.packet.validate_basic()?;
        validate_signer(&self.signer)
    }
}
