use derive_more::Display;

use crate::prelude::*;

/// Address of the account submitting a packet message.
///
/// For receive, acknowledgement and timeout messages this is the relayer,
/// which applications may reward. The address format is left to the host.
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
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct Signer(String);

impl Signer {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the address is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Signer {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<&str> for Signer {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

impl AsRef<str> for Signer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
