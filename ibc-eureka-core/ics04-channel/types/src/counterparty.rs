use ibc_eureka_core_commitment_types::merkle::{MerklePath, MerklePrefix};
use ibc_eureka_core_host_types::identifiers::ClientId;

/// Binds a local client to the client on the counterparty chain that tracks
/// this chain, together with the prefix under which the counterparty stores
/// its packet state.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Counterparty {
    pub client_id: ClientId,
    pub merkle_path_prefix: MerklePrefix,
}

impl Counterparty {
    pub fn new(client_id: ClientId, merkle_path_prefix: MerklePrefix) -> Self {
        Self {
            client_id,
            merkle_path_prefix,
        }
    }

    /// Full merkle path of `key` in the counterparty's store.
    pub fn merkle_path(&self, key: &[u8]) -> MerklePath {
        MerklePath::build(&self.merkle_path_prefix, key)
    }
}
