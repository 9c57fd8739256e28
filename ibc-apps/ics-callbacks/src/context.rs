//! Defines the contract keeper, the host's hook for executing callbacks
use core::fmt::Debug;

use displaydoc::Display;
use ibc_app_callbacks_types::CallbackData;
use ibc_eureka_core::channel::types::packet::Payload;
use ibc_eureka_core::host::app::AppContext;
use ibc_eureka_core::host::gas::GasError;
use ibc_eureka_core::host::types::error::HostError;
use ibc_eureka_core::host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Signer;

/// Error returned by a contract callback.
#[derive(Debug, Display)]
pub enum ContractError {
    /// host error: `{0}`
    Host(HostError),
    /// contract ran out of gas: `{0}`
    OutOfGas(GasError),
    /// contract panicked: `{description}`
    Panic { description: String },
    /// contract error: `{description}`
    Other { description: String },
}

impl ContractError {
    pub fn other<T: ToString>(description: T) -> Self {
        Self::Other {
            description: description.to_string(),
        }
    }
}

impl From<HostError> for ContractError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<GasError> for ContractError {
    fn from(e: GasError) -> Self {
        Self::OutOfGas(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::OutOfGas(e) => Some(e),
            _ => None,
        }
    }
}

/// The packet a callback is about, seen through the payload that carried
/// the callback metadata.
#[derive(Clone, Copy, Debug)]
pub struct CallbackPacket<'a> {
    pub source_client: &'a ClientId,
    pub destination_client: &'a ClientId,
    pub sequence: Sequence,
    pub payload: &'a Payload,
}

/// Executes callbacks on contracts, to be implemented by the host.
///
/// Every method runs on a branch of the application state with the
/// callback's execution gas limit. Gas must be charged to `ctx`; running
/// past the limit is reported either by returning
/// [`ContractError::OutOfGas`] or by leaving the meter exhausted. An `Err`
/// discards everything the callback wrote.
pub trait ContractKeeper: Debug {
    /// Called once the sending application accepted the packet. An error
    /// rejects the send.
    fn ibc_send_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        callback: &CallbackData,
    ) -> Result<(), ContractError>;

    /// Called with the acknowledgement the destination application wrote,
    /// which is the error acknowledgement sentinel if the receive failed.
    fn ibc_on_acknowledgement_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        acknowledgement: &[u8],
        relayer: &Signer,
        callback: &CallbackData,
    ) -> Result<(), ContractError>;

    fn ibc_on_timeout_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        relayer: &Signer,
        callback: &CallbackData,
    ) -> Result<(), ContractError>;

    /// Called on the destination chain once the receiving application has
    /// acknowledged the packet, synchronously or asynchronously.
    fn ibc_receive_packet_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        acknowledgement: &[u8],
        callback: &CallbackData,
    ) -> Result<(), ContractError>;
}
