//! A contract keeper whose contracts behave as scripted by the test.
use ibc_app_callbacks::context::{CallbackPacket, ContractError, ContractKeeper};
use ibc_app_callbacks::types::{CallbackData, CallbackType};
use ibc_eureka_core::host::app::AppContext;
use ibc_eureka_core::host::types::identifiers::Sequence;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Signer;

/// What a contract does when called back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ContractBehavior {
    #[default]
    Succeed,
    /// Writes its state, then returns an error.
    Fail,
    /// Writes its state, then panics.
    Panic,
    /// Charges the given gas, failing if that exceeds the limit.
    BurnGas(u64),
    /// Charges the given gas and reports success even if that exhausted the
    /// meter.
    BurnGasSilently(u64),
}

/// A callback as the keeper saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub callback_type: CallbackType,
    pub contract: String,
    pub sequence: Sequence,
    pub acknowledgement: Option<Vec<u8>>,
    pub relayer: Option<Signer>,
    pub execution_gas_limit: u64,
    pub calldata: Vec<u8>,
}

/// Records every callback and runs the behavior scripted for its type.
///
/// Contracts write a marker into the application store before acting out
/// their behavior, so tests can tell committed callbacks from discarded
/// ones.
#[derive(Clone, Debug, Default)]
pub struct MockContractKeeper {
    behaviors: Vec<(CallbackType, ContractBehavior)>,
    calls: Vec<ContractCall>,
}

impl MockContractKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(mut self, callback_type: CallbackType, behavior: ContractBehavior) -> Self {
        self.set_behavior(callback_type, behavior);
        self
    }

    pub fn set_behavior(&mut self, callback_type: CallbackType, behavior: ContractBehavior) {
        self.behaviors.retain(|(t, _)| *t != callback_type);
        self.behaviors.push((callback_type, behavior));
    }

    pub fn behavior(&self, callback_type: CallbackType) -> ContractBehavior {
        self.behaviors
            .iter()
            .find(|(t, _)| *t == callback_type)
            .map(|(_, behavior)| *behavior)
            .unwrap_or_default()
    }

    pub fn calls(&self) -> &[ContractCall] {
        &self.calls
    }

    pub fn calls_of(&self, callback_type: CallbackType) -> Vec<&ContractCall> {
        self.calls
            .iter()
            .filter(|call| call.callback_type == callback_type)
            .collect()
    }

    fn run(
        &mut self,
        ctx: &mut dyn AppContext,
        call: ContractCall,
    ) -> Result<(), ContractError> {
        let behavior = self.behavior(call.callback_type);
        let key = contract_state_key(&call.contract, call.callback_type, call.sequence);
        self.calls.push(call);

        ctx.store_mut().set(key, b"called".to_vec())?;

        match behavior {
            ContractBehavior::Succeed => Ok(()),
            ContractBehavior::Fail => Err(ContractError::other("contract rejected the callback")),
            ContractBehavior::Panic => Err(ContractError::Panic {
                description: "contract panicked".to_string(),
            }),
            ContractBehavior::BurnGas(gas) => Ok(ctx.gas_meter_mut().consume(gas)?),
            ContractBehavior::BurnGasSilently(gas) => {
                let _ = ctx.gas_meter_mut().consume(gas);
                Ok(())
            }
        }
    }
}

/// Key of the marker a contract writes when called back.
pub fn contract_state_key(contract: &str, callback_type: CallbackType, sequence: Sequence) -> Vec<u8> {
    format!("contracts/{contract}/{callback_type}/{sequence}").into_bytes()
}

fn call(
    callback_type: CallbackType,
    packet: &CallbackPacket<'_>,
    callback: &CallbackData,
) -> ContractCall {
    ContractCall {
        callback_type,
        contract: callback.callback_address.clone(),
        sequence: packet.sequence,
        acknowledgement: None,
        relayer: None,
        execution_gas_limit: callback.execution_gas_limit,
        calldata: callback.calldata.clone(),
    }
}

impl ContractKeeper for MockContractKeeper {
    fn ibc_send_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        callback: &CallbackData,
    ) -> Result<(), ContractError> {
        self.run(ctx, call(CallbackType::SendPacket, packet, callback))
    }

    fn ibc_on_acknowledgement_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        acknowledgement: &[u8],
        relayer: &Signer,
        callback: &CallbackData,
    ) -> Result<(), ContractError> {
        let call = ContractCall {
            acknowledgement: Some(acknowledgement.to_vec()),
            relayer: Some(relayer.clone()),
            ..call(CallbackType::AcknowledgementPacket, packet, callback)
        };
        self.run(ctx, call)
    }

    fn ibc_on_timeout_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        relayer: &Signer,
        callback: &CallbackData,
    ) -> Result<(), ContractError> {
        let call = ContractCall {
            relayer: Some(relayer.clone()),
            ..call(CallbackType::TimeoutPacket, packet, callback)
        };
        self.run(ctx, call)
    }

    fn ibc_receive_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        acknowledgement: &[u8],
        callback: &CallbackData,
    ) -> Result<(), ContractError> {
        let call = ContractCall {
            acknowledgement: Some(acknowledgement.to_vec()),
            ..call(CallbackType::ReceivePacket, packet, callback)
        };
        self.run(ctx, call)
    }
}
