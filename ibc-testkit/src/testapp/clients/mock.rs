//! A light-client verifier that tracks the counterparty by copying its
//! provable state at every update.
use alloc::collections::BTreeMap;

use ibc_eureka_core::client::context::ClientValidationContext;
use ibc_eureka_core::client::types::error::ClientError;
use ibc_eureka_core::client::types::{Height, Status};
use ibc_eureka_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_eureka_core::commitment_types::merkle::MerklePath;
use ibc_eureka_core::host::types::identifiers::ClientId;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Timestamp;
use prost::Message;

/// Proof handed to the mock verifier. It only names the height it was
/// produced at; the verifier answers from the consensus state it holds.
#[derive(Clone, PartialEq, Message)]
pub struct RawMockProof {
    #[prost(uint64, tag = "1")]
    pub revision_number: u64,
    #[prost(uint64, tag = "2")]
    pub revision_height: u64,
}

impl RawMockProof {
    pub fn at(height: &Height) -> Self {
        Self {
            revision_number: height.revision_number(),
            revision_height: height.revision_height(),
        }
    }

    fn proves(&self, height: &Height) -> bool {
        self.revision_number == height.revision_number()
            && self.revision_height == height.revision_height()
    }
}

/// Builds the proof a relayer submits for state at `height`.
pub fn mock_proof(height: &Height) -> CommitmentProofBytes {
    CommitmentProofBytes::try_from(RawMockProof::at(height).encode_to_vec())
        .expect("a proof at a non-zero height is never empty")
}

/// What the client knows about the counterparty at one height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockConsensusState {
    pub timestamp: Timestamp,
    /// The counterparty's provable entries, keyed by their full leaf key.
    pub root: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MockConsensusState {
    pub fn new(timestamp: Timestamp, root: BTreeMap<Vec<u8>, Vec<u8>>) -> Self {
        Self { timestamp, root }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockClientRecord {
    pub status: Status,
    pub consensus_states: BTreeMap<Height, MockConsensusState>,
}

impl Default for MockClientRecord {
    fn default() -> Self {
        Self {
            status: Status::Active,
            consensus_states: BTreeMap::new(),
        }
    }
}

/// The light clients of a mock host, by identifier.
#[derive(Clone, Debug, Default)]
pub struct MockClients {
    clients: BTreeMap<ClientId, MockClientRecord>,
}

impl MockClients {
    pub fn create_client(&mut self, client_id: ClientId) {
        self.clients.entry(client_id).or_default();
    }

    pub fn update_client(
        &mut self,
        client_id: &ClientId,
        height: Height,
        consensus_state: MockConsensusState,
    ) -> Result<(), ClientError> {
        self.record_mut(client_id)?
            .consensus_states
            .insert(height, consensus_state);
        Ok(())
    }

    pub fn set_status(&mut self, client_id: &ClientId, status: Status) -> Result<(), ClientError> {
        self.record_mut(client_id)?.status = status;
        Ok(())
    }

    pub fn record(&self, client_id: &ClientId) -> Result<&MockClientRecord, ClientError> {
        self.clients
            .get(client_id)
            .ok_or_else(|| ClientError::ClientNotFound(client_id.clone()))
    }

    fn record_mut(&mut self, client_id: &ClientId) -> Result<&mut MockClientRecord, ClientError> {
        self.clients
            .get_mut(client_id)
            .ok_or_else(|| ClientError::ClientNotFound(client_id.clone()))
    }

    fn consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<&MockConsensusState, ClientError> {
        self.record(client_id)?
            .consensus_states
            .get(height)
            .ok_or_else(|| ClientError::MissingConsensusState {
                client_id: client_id.clone(),
                height: *height,
            })
    }

    fn proven_root(
        &self,
        client_id: &ClientId,
        height: &Height,
        proof: &CommitmentProofBytes,
    ) -> Result<&BTreeMap<Vec<u8>, Vec<u8>>, String> {
        let raw = RawMockProof::decode(proof.as_bytes()).map_err(|e| e.to_string())?;
        if !raw.proves(height) {
            return Err(format!(
                "proof was produced at {}-{}, not at {height}",
                raw.revision_number, raw.revision_height
            ));
        }

        self.consensus_state(client_id, height)
            .map(|consensus_state| &consensus_state.root)
            .map_err(|e| e.to_string())
    }
}

impl ClientValidationContext for MockClients {
    fn client_status(&self, client_id: &ClientId) -> Result<Status, ClientError> {
        Ok(self.record(client_id)?.status)
    }

    fn client_latest_height(&self, client_id: &ClientId) -> Result<Height, ClientError> {
        self.record(client_id)?
            .consensus_states
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| ClientError::Other {
                description: format!("client `{client_id}` has no consensus state"),
            })
    }

    fn client_timestamp_at_height(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Timestamp, ClientError> {
        Ok(self.consensus_state(client_id, height)?.timestamp)
    }

    fn verify_membership(
        &self,
        client_id: &ClientId,
        height: &Height,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
        value: &[u8],
    ) -> Result<(), ClientError> {
        let root = self
            .proven_root(client_id, height, proof)
            .map_err(|description| ClientError::FailedMembershipVerification { description })?;

        match root.get(path.leaf_key()) {
            Some(stored) if stored.as_slice() == value => Ok(()),
            Some(_) => Err(ClientError::FailedMembershipVerification {
                description: format!("value stored under {path} differs"),
            }),
            None => Err(ClientError::FailedMembershipVerification {
                description: format!("nothing stored under {path}"),
            }),
        }
    }

    fn verify_non_membership(
        &self,
        client_id: &ClientId,
        height: &Height,
        proof: &CommitmentProofBytes,
        path: &MerklePath,
    ) -> Result<(), ClientError> {
        let root = self
            .proven_root(client_id, height, proof)
            .map_err(|description| ClientError::FailedNonMembershipVerification { description })?;

        if root.contains_key(path.leaf_key()) {
            return Err(ClientError::FailedNonMembershipVerification {
                description: format!("a value is stored under {path}"),
            });
        }

        Ok(())
    }
}
