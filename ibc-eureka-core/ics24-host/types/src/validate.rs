//! Identifier validation shared by [`ClientId`](crate::identifiers::ClientId)
//! and [`PortId`](crate::identifiers::PortId).
//!
//! Identifiers end up inside store paths, so they may only use characters
//! that can never be confused with the path separator.

use core::ops::RangeInclusive;

use ibc_primitives::prelude::*;

use crate::error::IdentifierError;

/// Client identifiers are `{client-type}-{counter}`, e.g. `07-tendermint-0`.
pub const CLIENT_ID_LENGTH: RangeInclusive<u64> = 9..=64;

pub const PORT_ID_LENGTH: RangeInclusive<u64> = 2..=128;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}

fn validate_identifier(id: &str, length: RangeInclusive<u64>) -> Result<(), IdentifierError> {
    if !id.chars().all(is_identifier_char) {
        return Err(IdentifierError::InvalidCharacter { id: id.to_owned() });
    }

    let len = u64::try_from(id.len()).unwrap_or(u64::MAX);
    if !length.contains(&len) {
        return Err(IdentifierError::InvalidLength {
            id: id.to_owned(),
            min: *length.start(),
            max: *length.end(),
        });
    }

    Ok(())
}

pub fn validate_client_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier(id, CLIENT_ID_LENGTH)
}

pub fn validate_port_identifier(id: &str) -> Result<(), IdentifierError> {
    validate_identifier(id, PORT_ID_LENGTH)
}
