//! Serde helpers shared by the IBC Eureka domain types.

use core::fmt::Display;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serializer};
use subtle_encoding::{Encoding, Hex};

use crate::prelude::*;

/// Serializes a value through its `Display` implementation.
// Note: This method serializes to a String instead of a str in order to
// avoid a wasm compilation issue.
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.serialize_str(value.to_string().as_ref())
}

/// Deserializes a value through its `FromStr` implementation.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
{
    T::from_str(<String>::deserialize(deserializer)?.as_str()).map_err(de::Error::custom)
}

/// (De)serializes raw bytes as an upper-case hex string.
pub mod hex_upper {
    use super::*;

    pub fn serialize<T, S>(data: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        let hex = Hex::upper_case()
            .encode_to_string(data)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = <String>::deserialize(deserializer)?;
        Hex::upper_case()
            .decode(hex.as_bytes())
            .map_err(de::Error::custom)
    }
}
