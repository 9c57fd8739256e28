//! Block heights at which counterparty proofs are verified.

use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use core::str::FromStr;

use ibc_eureka_core_host_types::error::DecodingError;
use ibc_primitives::prelude::*;

use crate::error::ClientError;

/// A non-zero block height within a revision of a chain.
///
/// Heights order by revision first, so any height of a later revision is
/// above every height of an earlier one.
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
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height {
    revision_number: u64,
    revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Result<Self, ClientError> {
        if revision_height == 0 {
            return Err(ClientError::InvalidHeight);
        }
        Ok(Self {
            revision_number,
            revision_height,
        })
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    pub fn revision_height(&self) -> u64 {
        self.revision_height
    }

    /// The next block of the same revision.
    pub fn increment(&self) -> Self {
        Self {
            revision_number: self.revision_number,
            revision_height: self.revision_height.saturating_add(1),
        }
    }
}

impl Debug for Height {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Height({self})")
    }
}

/// Formats as `{revision_number}-{revision_height}`.
impl Display for Height {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

impl FromStr for Height {
    type Err = DecodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|e| DecodingError::invalid_raw_data(format!("height `{s}`: {e}")))
        };
        let (number, height) = s
            .split_once('-')
            .ok_or_else(|| DecodingError::invalid_raw_data(format!("height `{s}` has no revision")))?;

        Self::new(parse(number)?, parse(height)?)
            .map_err(|e| DecodingError::invalid_raw_data(format!("height `{s}`: {e}")))
    }
}
