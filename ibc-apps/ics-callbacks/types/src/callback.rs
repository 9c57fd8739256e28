use ibc_primitives::prelude::*;
use serde_json::{Map, Value};
use subtle_encoding::hex;

use crate::error::CallbacksError;
use crate::{
    CALLBACK_ADDRESS_KEY, CALLDATA_KEY, DESTINATION_CALLBACK_KEY, SOURCE_CALLBACK_KEY,
    USER_DEFINED_GAS_LIMIT_KEY,
};

/// The packet lifecycle event a callback is attached to.
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
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CallbackType {
    #[display(fmt = "send_packet")]
    SendPacket,
    #[display(fmt = "receive_packet")]
    ReceivePacket,
    #[display(fmt = "acknowledgement_packet")]
    AcknowledgementPacket,
    #[display(fmt = "timeout_packet")]
    TimeoutPacket,
}

impl CallbackType {
    /// Whether the callback runs on the chain that sent the packet.
    pub fn is_source(&self) -> bool {
        !matches!(self, Self::ReceivePacket)
    }

    /// The memo key the callback metadata is read from.
    pub fn memo_key(&self) -> &'static str {
        if self.is_source() {
            SOURCE_CALLBACK_KEY
        } else {
            DESTINATION_CALLBACK_KEY
        }
    }
}

/// Callback metadata resolved for a single lifecycle event.
///
/// Computed from the packet memo every time an event fires and dropped once
/// the event has been processed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackData {
    /// The contract the callback is delivered to.
    pub callback_address: String,
    /// The packet sender, for source callbacks of applications that track
    /// one. Empty otherwise.
    pub sender_address: String,
    /// Gas the callback may consume in this execution.
    pub execution_gas_limit: u64,
    /// Gas the callback is entitled to. When it exceeds
    /// `execution_gas_limit`, an out-of-gas callback can be retried by
    /// relaying with more gas.
    pub commit_gas_limit: u64,
    /// Version of the application the middleware wraps.
    pub application_version: String,
    pub calldata: Vec<u8>,
}

impl CallbackData {
    /// Resolves the callback `callback_type` requests through `memo`.
    ///
    /// Returns `Ok(None)` when the memo does not opt in to that callback, and
    /// an error when it opts in with malformed metadata.
    pub fn from_memo(
        memo: &str,
        callback_type: CallbackType,
        packet_sender: Option<String>,
        application_version: &str,
        remaining_gas: u64,
        max_callback_gas: u64,
    ) -> Result<Option<Self>, CallbacksError> {
        let Some(metadata) = callback_metadata(memo, callback_type.memo_key()) else {
            return Ok(None);
        };

        let callback_address = match metadata.get(CALLBACK_ADDRESS_KEY) {
            Some(Value::String(address)) if !address.trim().is_empty() => address.clone(),
            _ => {
                return Err(CallbacksError::invalid_callback_data(
                    "callback address must be a non-empty string",
                ))
            }
        };

        let sender_address = if callback_type.is_source() {
            packet_sender.unwrap_or_default()
        } else {
            String::new()
        };

        let user_gas_limit = user_defined_gas_limit(&metadata)?;
        let (execution_gas_limit, commit_gas_limit) =
            compute_gas_limits(user_gas_limit, remaining_gas, max_callback_gas);

        Ok(Some(Self {
            callback_address,
            sender_address,
            execution_gas_limit,
            commit_gas_limit,
            application_version: application_version.to_string(),
            calldata: calldata(&metadata)?,
        }))
    }

    /// Whether running out of gas should abort the transaction so that it
    /// can be retried with a larger budget.
    pub fn allow_retry(&self) -> bool {
        self.execution_gas_limit < self.commit_gas_limit
    }
}

/// Derives `(execution_gas_limit, commit_gas_limit)`.
///
/// A zero user limit stands for "whatever the relayer provided". The commit
/// limit is not capped by `remaining_gas`.
pub fn compute_gas_limits(
    user_gas_limit: u64,
    remaining_gas: u64,
    max_callback_gas: u64,
) -> (u64, u64) {
    let base = if user_gas_limit != 0 {
        user_gas_limit
    } else {
        remaining_gas
    };

    let execution_gas_limit = base.min(remaining_gas).min(max_callback_gas);
    let commit_gas_limit = base.min(max_callback_gas);

    (execution_gas_limit, commit_gas_limit)
}

/// The JSON object stored under `key`, if the memo is a JSON object that has
/// one.
fn callback_metadata(memo: &str, key: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(memo).ok()? {
        Value::Object(mut fields) => match fields.remove(key)? {
            Value::Object(metadata) => Some(metadata),
            _ => None,
        },
        _ => None,
    }
}

fn user_defined_gas_limit(metadata: &Map<String, Value>) -> Result<u64, CallbacksError> {
    match metadata.get(USER_DEFINED_GAS_LIMIT_KEY) {
        None => Ok(0),
        Some(Value::String(gas_limit)) if gas_limit.is_empty() => Ok(0),
        Some(Value::String(gas_limit)) => gas_limit.parse::<u64>().map_err(|e| {
            CallbacksError::invalid_callback_data(format!(
                "gas limit must be a valid uint64: {e}"
            ))
        }),
        Some(other) => Err(CallbacksError::invalid_callback_data(format!(
            "gas limit [{other}] must be a string"
        ))),
    }
}

fn calldata(metadata: &Map<String, Value>) -> Result<Vec<u8>, CallbacksError> {
    match metadata.get(CALLDATA_KEY) {
        None => Ok(Vec::new()),
        Some(Value::String(calldata)) => hex::decode(calldata).map_err(|e| {
            CallbacksError::invalid_callback_data(format!(
                "calldata must be a valid hex string: {e}"
            ))
        }),
        Some(_) => Err(CallbacksError::invalid_callback_data(
            "calldata must be a string",
        )),
    }
}
