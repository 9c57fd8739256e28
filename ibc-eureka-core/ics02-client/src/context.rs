use ibc_eureka_core_client_types::error::ClientError;
use ibc_eureka_core_client_types::{Height, Status};
use ibc_eureka_core_commitment_types::commitment::CommitmentProofBytes;
use ibc_eureka_core_commitment_types::merkle::MerklePath;
use ibc_eureka_core_host_types::identifiers::ClientId;
use ibc_primitives::Timestamp;

/// Light-client verifier capability, keyed by the identifier of the client
/// tracking the counterparty chain.
pub trait ClientValidationContext {
    /// Returns the status of the client.
    fn client_status(&self, client_id: &ClientId) -> Result<Status, ClientError>;

    /// Returns the latest height the client has a consensus state for.
    fn client_latest_height(&self, client_id: &ClientId) -> Result<Height, ClientError>;

    /// Returns the counterparty block timestamp recorded at `height`.
    fn client_timestamp_at_height(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Timestamp, ClientError>;

    /// Verifies that `value` is stored under `path` on the counterparty at
    /// `height`.
    fn verify_membership(
        &self,
        client_id: &ClientId,
        height: &Height,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
        value: &[u8],
    ) -> Result<(), ClientError>;

    /// Verifies that nothing is stored under `path` on the counterparty at
    /// `height`.
    fn verify_non_membership(
        &self,
        client_id: &ClientId,
        height: &Height,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
    ) -> Result<(), ClientError>;
}
