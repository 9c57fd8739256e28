//! Packets, payloads and memos used across tests.

use ibc_app_callbacks::types::{
    CALLBACK_ADDRESS_KEY, CALLDATA_KEY, DESTINATION_CALLBACK_KEY, SOURCE_CALLBACK_KEY,
    USER_DEFINED_GAS_LIMIT_KEY,
};
use ibc_eureka_core::channel::types::packet::{Packet, Payload};
use ibc_eureka_core::channel::types::timeout::TimeoutTimestamp;
use ibc_eureka_core::host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::{Signer, Timestamp};
use serde_json::{json, Map, Value};
use subtle_encoding::hex;

use crate::testapp::applications::transfer::TransferPacketData;

pub const SENDER: &str = "cosmos1sender";
pub const RECEIVER: &str = "cosmos1receiver";
pub const DENOM: &str = "uatom";
pub const CONTRACT: &str = "cosmos1contract";

pub fn dummy_signer() -> Signer {
    Signer::from("cosmos1relayer")
}

/// The `counter`-th tendermint client, `07-tendermint-{counter}`.
pub fn dummy_client_id(counter: u64) -> ClientId {
    ClientId::new("07-tendermint", counter).expect("valid client id")
}

/// Transfer data moving `amount` of [`DENOM`] from [`SENDER`] to
/// [`RECEIVER`].
pub fn dummy_transfer_data(amount: u64) -> TransferPacketData {
    TransferPacketData::new(DENOM, amount, SENDER, RECEIVER)
}

pub fn dummy_transfer_payload(amount: u64) -> Payload {
    dummy_transfer_data(amount).into_payload()
}

/// A timeout `secs` seconds after `now`.
pub fn timeout_after(now: Timestamp, secs: u64) -> TimeoutTimestamp {
    TimeoutTimestamp::from_unix_seconds(now.unix_seconds() + secs)
}

pub fn dummy_packet(sequence: u64, payloads: Vec<Payload>) -> Packet {
    Packet::new(
        Sequence::from(sequence),
        dummy_client_id(0),
        dummy_client_id(1),
        TimeoutTimestamp::from_unix_seconds(1_700_000_000),
        payloads,
    )
}

/// Callback metadata of a single callback, as embedded in a memo.
#[derive(Clone, Debug, Default)]
pub struct CallbackMemo {
    pub address: String,
    pub gas_limit: Option<String>,
    pub calldata: Option<Vec<u8>>,
}

impl CallbackMemo {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit.to_string());
        self
    }

    pub fn with_calldata(mut self, calldata: &[u8]) -> Self {
        self.calldata = Some(calldata.to_vec());
        self
    }

    fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert(CALLBACK_ADDRESS_KEY.to_string(), json!(self.address));
        if let Some(gas_limit) = &self.gas_limit {
            fields.insert(USER_DEFINED_GAS_LIMIT_KEY.to_string(), json!(gas_limit));
        }
        if let Some(calldata) = &self.calldata {
            let encoded = String::from_utf8(hex::encode(calldata)).expect("hex is ascii");
            fields.insert(CALLDATA_KEY.to_string(), json!(encoded));
        }
        Value::Object(fields)
    }
}

/// A memo requesting the given source and destination callbacks.
pub fn callback_memo(source: Option<CallbackMemo>, destination: Option<CallbackMemo>) -> String {
    let mut memo = Map::new();
    if let Some(source) = source {
        memo.insert(SOURCE_CALLBACK_KEY.to_string(), source.to_value());
    }
    if let Some(destination) = destination {
        memo.insert(DESTINATION_CALLBACK_KEY.to_string(), destination.to_value());
    }
    Value::Object(memo).to_string()
}

/// A transfer payload whose memo requests the given callbacks.
pub fn callback_payload(
    amount: u64,
    source: Option<CallbackMemo>,
    destination: Option<CallbackMemo>,
) -> Payload {
    dummy_transfer_data(amount)
        .with_memo(callback_memo(source, destination))
        .into_payload()
}
