//! Merkle key paths.

use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_primitives::prelude::*;

use crate::error::CommitmentError;

/// The key-path prefix under which a counterparty stores its provable packet
/// state, one entry per level of its store tree (for instance the store name
/// followed by an in-store prefix).
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
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MerklePrefix {
    pub key_path: Vec<Vec<u8>>,
}

impl MerklePrefix {
    pub fn new(key_path: Vec<Vec<u8>>) -> Self {
        Self { key_path }
    }

    pub fn is_empty(&self) -> bool {
        self.key_path.is_empty()
    }
}

/// A fully resolved key path, the argument of membership verification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MerklePath {
    pub key_path: Vec<Vec<u8>>,
}

impl MerklePath {
    pub fn new(key_path: Vec<Vec<u8>>) -> Result<Self, CommitmentError> {
        if key_path.is_empty() {
            return Err(CommitmentError::EmptyMerklePath);
        }
        Ok(Self { key_path })
    }

    /// Appends `key` to the last element of `prefix`.
    ///
    /// An empty prefix yields a single-element path made of `key` alone.
    pub fn build(prefix: &MerklePrefix, key: &[u8]) -> Self {
        let mut key_path = prefix.key_path.clone();

        match key_path.last_mut() {
            Some(last) => last.extend_from_slice(key),
            None => key_path.push(key.to_vec()),
        }

        Self { key_path }
    }

    /// The last element of the path, the key within the innermost store.
    pub fn leaf_key(&self) -> &[u8] {
        self.key_path.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl Display for MerklePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let segments: Vec<String> = self
            .key_path
            .iter()
            .map(|segment| String::from_utf8_lossy(segment).into_owned())
            .collect();
        write!(f, "{}", segments.join("/"))
    }
}
