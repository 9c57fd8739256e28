//! A token-transfer flavoured application used to drive the packet core.
use ibc_eureka_core::channel::types::acknowledgement::error_acknowledgement;
use ibc_eureka_core::channel::types::packet::Payload;
use ibc_eureka_core::host::app::AppContext;
use ibc_eureka_core::host::gas::GasError;
use ibc_eureka_core::host::store::KvStore;
use ibc_eureka_core::host::types::error::HostError;
use ibc_eureka_core::host::types::identifiers::{ClientId, PortId, Sequence};
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Signer;
use ibc_eureka_core::router::module::{Module, PacketDataProvider, PacketDataUnmarshaler};
use ibc_eureka_core::router::types::error::{AbortSignal, ModuleError};
use ibc_eureka_core::router::types::event::ModuleEvent;
use ibc_eureka_core::router::types::module::{ModuleExtras, RecvPacketResult};
use serde::{Deserialize, Serialize};

pub const TRANSFER_MODULE_ID: &str = "transfer";
pub const TRANSFER_VERSION: &str = "ics20-1";
pub const JSON_ENCODING: &str = "application/json";

pub const TRANSFER_EVENT: &str = "fungible_token_packet";

/// Acknowledgement written for a successful receive.
pub const SUCCESS_ACK: &[u8] = br#"{"result":"AQ=="}"#;

const BALANCE_PREFIX: &str = "balances";
const ESCROW_PREFIX: &str = "escrow";

/// The JSON packet data of a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPacketData {
    pub denom: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl TransferPacketData {
    pub fn new(
        denom: impl Into<String>,
        amount: u64,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
            sender: sender.into(),
            receiver: receiver.into(),
            memo: String::new(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    fn parsed_amount(&self) -> Result<u64, ModuleError> {
        self.amount
            .parse()
            .map_err(|e| ModuleError::app(format!("invalid amount `{}`: {e}", self.amount)))
    }

    /// Serializes the data into a transfer payload between the transfer
    /// ports.
    pub fn into_payload(self) -> Payload {
        let value = serde_json::to_vec(&self).unwrap_or_default();
        Payload::new(
            PortId::transfer(),
            PortId::transfer(),
            TRANSFER_VERSION,
            JSON_ENCODING,
            value,
        )
    }
}

impl PacketDataProvider for TransferPacketData {
    fn memo(&self) -> Option<&str> {
        if self.memo.is_empty() {
            None
        } else {
            Some(&self.memo)
        }
    }

    fn packet_sender(&self, _source_port: &PortId) -> Option<String> {
        Some(self.sender.clone())
    }
}

/// How the application answers received packets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RecvMode {
    #[default]
    Sync,
    /// The acknowledgement is written later through `write_acknowledgement`.
    Async,
    /// Every receive fails at the application level.
    Fail,
}

/// Escrows tokens on send, credits them on receive and refunds them when
/// the packet fails or times out.
#[derive(Clone, Debug, Default)]
pub struct DummyTransferModule {
    pub recv_mode: RecvMode,
    /// Gas charged at the start of every callback.
    pub gas_per_callback: u64,
}

impl DummyTransferModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recv_mode(mut self, recv_mode: RecvMode) -> Self {
        self.recv_mode = recv_mode;
        self
    }

    pub fn with_gas_per_callback(mut self, gas: u64) -> Self {
        self.gas_per_callback = gas;
        self
    }

    fn charge(&self, ctx: &mut dyn AppContext) -> Result<(), ModuleError> {
        ctx.gas_meter_mut()
            .consume(self.gas_per_callback)
            .map_err(|GasError::OutOfGas { consumed, .. }| {
                ModuleError::from(AbortSignal::OutOfGas {
                    required_gas: consumed,
                })
            })
    }

    fn refund(
        &self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        reason: &str,
    ) -> Result<ModuleExtras, ModuleError> {
        let data = self.unmarshal_packet_data(payload)?;
        let amount = data.parsed_amount()?;

        debit(ctx.store_mut(), &escrow_account(source_client), amount)?;
        credit(ctx.store_mut(), &data.sender, amount)?;

        Ok(extras(
            transfer_event(reason, &data, sequence),
            format!("refunded {amount}{} to {}", data.denom, data.sender),
        ))
    }
}

impl Module for DummyTransferModule {
    fn on_send_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        _destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        _signer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        self.charge(ctx)?;

        let data = self.unmarshal_packet_data(payload)?;
        let amount = data.parsed_amount()?;

        debit(ctx.store_mut(), &data.sender, amount)?;
        credit(ctx.store_mut(), &escrow_account(source_client), amount)?;

        Ok(extras(
            transfer_event("send", &data, sequence),
            format!("escrowed {amount}{} from {}", data.denom, data.sender),
        ))
    }

    fn on_recv_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        _source_client: &ClientId,
        _destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        _relayer: &Signer,
    ) -> Result<(ModuleExtras, RecvPacketResult), ModuleError> {
        self.charge(ctx)?;

        let data = match self.unmarshal_packet_data(payload) {
            Ok(data) => data,
            Err(e) => {
                let failed = ModuleExtras {
                    events: vec![],
                    log: vec![format!("cannot decode transfer data: {e}")],
                };
                return Ok((failed, RecvPacketResult::failure()));
            }
        };
        let amount = match data.parsed_amount() {
            Ok(amount) => amount,
            Err(e) => {
                let failed = extras(transfer_event("recv", &data, sequence), e.to_string());
                return Ok((failed, RecvPacketResult::failure()));
            }
        };

        credit(ctx.store_mut(), &data.receiver, amount)?;

        let result = match self.recv_mode {
            RecvMode::Sync => RecvPacketResult::success(SUCCESS_ACK.to_vec()),
            RecvMode::Async => RecvPacketResult::async_ack(),
            RecvMode::Fail => RecvPacketResult::failure(),
        };

        Ok((
            extras(
                transfer_event("recv", &data, sequence).with_attribute("status", result.status),
                format!("credited {amount}{} to {}", data.denom, data.receiver),
            ),
            result,
        ))
    }

    fn on_acknowledgement_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        _destination_client: &ClientId,
        sequence: Sequence,
        acknowledgement: &[u8],
        payload: &Payload,
        _relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        self.charge(ctx)?;

        if acknowledgement == error_acknowledgement().as_slice() {
            return self.refund(ctx, source_client, sequence, payload, "ack_error");
        }

        let data = self.unmarshal_packet_data(payload)?;
        Ok(extras(
            transfer_event("ack", &data, sequence),
            format!("packet `{sequence}` acknowledged"),
        ))
    }

    fn on_timeout_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        _destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        _relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        self.charge(ctx)?;
        self.refund(ctx, source_client, sequence, payload, "timeout")
    }
}

impl PacketDataUnmarshaler for DummyTransferModule {
    type PacketData = TransferPacketData;

    fn unmarshal_packet_data(&self, payload: &Payload) -> Result<TransferPacketData, ModuleError> {
        if payload.encoding != JSON_ENCODING {
            return Err(ModuleError::app(format!(
                "unsupported encoding `{}`",
                payload.encoding
            )));
        }
        serde_json::from_slice(&payload.value).map_err(ModuleError::app)
    }
}

/// The account holding the tokens escrowed for packets sent through
/// `client_id`.
pub fn escrow_account(client_id: &ClientId) -> String {
    format!("{ESCROW_PREFIX}/{client_id}")
}

fn balance_key(account: &str) -> Vec<u8> {
    format!("{BALANCE_PREFIX}/{account}").into_bytes()
}

/// Balance of `account` in the application store.
pub fn balance_of(store: &dyn KvStore, account: &str) -> Result<u64, HostError> {
    let Some(bytes) = store.get(&balance_key(account))? else {
        return Ok(0);
    };
    let raw: [u8; 8] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| HostError::failed_to_parse(format!("balance of `{account}`")))?;
    Ok(u64::from_be_bytes(raw))
}

/// Overwrites the balance of `account`.
pub fn set_balance(store: &mut dyn KvStore, account: &str, amount: u64) -> Result<(), HostError> {
    store.set(balance_key(account), amount.to_be_bytes().to_vec())
}

fn credit(store: &mut dyn KvStore, account: &str, amount: u64) -> Result<(), ModuleError> {
    let balance = balance_of(store, account).map_err(ModuleError::app)?;
    let updated = balance
        .checked_add(amount)
        .ok_or_else(|| ModuleError::app(format!("balance of `{account}` overflows")))?;
    set_balance(store, account, updated).map_err(ModuleError::app)
}

fn debit(store: &mut dyn KvStore, account: &str, amount: u64) -> Result<(), ModuleError> {
    let balance = balance_of(store, account).map_err(ModuleError::app)?;
    let updated = balance.checked_sub(amount).ok_or_else(|| {
        ModuleError::app(format!(
            "insufficient funds: `{account}` holds {balance}, needs {amount}"
        ))
    })?;
    set_balance(store, account, updated).map_err(ModuleError::app)
}

fn transfer_event(action: &str, data: &TransferPacketData, sequence: Sequence) -> ModuleEvent {
    ModuleEvent::new(TRANSFER_EVENT)
        .with_attribute("action", action)
        .with_attribute("sender", &data.sender)
        .with_attribute("receiver", &data.receiver)
        .with_attribute("denom", &data.denom)
        .with_attribute("amount", &data.amount)
        .with_attribute("packet_sequence", sequence)
}

fn extras(event: ModuleEvent, log: String) -> ModuleExtras {
    ModuleExtras {
        events: vec![event],
        log: vec![log],
    }
}
