use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;

use ibc_primitives::prelude::*;

use crate::error::IdentifierError;
use crate::validate::validate_client_identifier;

/// Identifier of a light client on the host chain.
///
/// In IBC Eureka the client identifier doubles as the packet "channel": a
/// packet is sent from `source_client` on one chain to `destination_client`
/// on the other, and every piece of packet state is keyed by it.
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
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Builds the conventional `{client_type}-{counter}` identifier, e.g.
    /// `07-tendermint-0`.
    pub fn new(client_type: &str, counter: u64) -> Result<Self, IdentifierError> {
        format!("{client_type}-{counter}").parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn validate(&self) -> Result<(), IdentifierError> {
        validate_client_identifier(&self.0)
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_client_identifier(s)?;
        Ok(Self(s.to_owned()))
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl PartialEq<str> for ClientId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
