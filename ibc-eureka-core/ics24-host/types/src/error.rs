//! Foundational error types shared by the IBC Eureka host crates.

use alloc::string::FromUtf8Error;

use displaydoc::Display;
use ibc_primitives::prelude::*;
use prost::DecodeError as ProstError;

/// Errors that originate from host implementations.
#[derive(Debug, Display)]
pub enum HostError {
    /// invalid data: `{description}`
    InvalidData { description: String },
    /// missing data: `{description}`
    MissingData { description: String },
    /// unexpected data: `{description}`
    UnexpectedData { description: String },
    /// failed to store data: `{description}`
    FailedToStoreData { description: String },
    /// failed to retrieve data from store: `{description}`
    FailedToRetrieveFromStore { description: String },
    /// failed to parse data: `{description}`
    FailedToParseData { description: String },
    /// unauthorized signer: `{description}`
    UnauthorizedSigner { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl HostError {
    pub fn invalid_data<T: ToString>(description: T) -> Self {
        Self::InvalidData {
            description: description.to_string(),
        }
    }

    pub fn missing_data<T: ToString>(description: T) -> Self {
        Self::MissingData {
            description: description.to_string(),
        }
    }

    pub fn failed_to_store<T: ToString>(description: T) -> Self {
        Self::FailedToStoreData {
            description: description.to_string(),
        }
    }

    pub fn failed_to_retrieve<T: ToString>(description: T) -> Self {
        Self::FailedToRetrieveFromStore {
            description: description.to_string(),
        }
    }

    pub fn failed_to_parse<T: ToString>(description: T) -> Self {
        Self::FailedToParseData {
            description: description.to_string(),
        }
    }
}

impl From<DecodingError> for HostError {
    fn from(e: DecodingError) -> Self {
        Self::FailedToParseData {
            description: e.to_string(),
        }
    }
}

/// Errors that arise when parsing identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Display)]
pub enum IdentifierError {
    /// id `{id}` has invalid length; must be between [`{min}`,`{max}`]
    InvalidLength { id: String, min: u64, max: u64 },
    /// id `{id}` can only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, - `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// failed to parse `{value}` as a sequence: `{reason}`
    InvalidStringAsSequence { value: String, reason: String },
}

/// Errors that occur during the process of decoding, deserializing,
/// and/or converting raw types into domain types.
#[derive(Debug, Display)]
pub enum DecodingError {
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// utf-8 String decoding error: `{0}`
    StringUtf8(FromUtf8Error),
    /// prost decoding error: `{0}`
    Prost(ProstError),
    /// invalid hash bytes: `{description}`
    InvalidHash { description: String },
    /// invalid JSON data: `{description}`
    InvalidJson { description: String },
    /// invalid raw data: `{description}`
    InvalidRawData { description: String },
    /// missing raw data: `{description}`
    MissingRawData { description: String },
}

impl DecodingError {
    pub fn missing_raw_data<T: ToString>(description: T) -> Self {
        Self::MissingRawData {
            description: description.to_string(),
        }
    }

    pub fn invalid_raw_data<T: ToString>(description: T) -> Self {
        Self::InvalidRawData {
            description: description.to_string(),
        }
    }
}

impl From<IdentifierError> for DecodingError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<ProstError> for DecodingError {
    fn from(e: ProstError) -> Self {
        Self::Prost(e)
    }
}

impl From<FromUtf8Error> for DecodingError {
    fn from(e: FromUtf8Error) -> Self {
        Self::StringUtf8(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            Self::StringUtf8(e) => Some(e),
            Self::Prost(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HostError {}
