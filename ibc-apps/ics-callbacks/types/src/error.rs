//! Defines the callbacks middleware error type
use displaydoc::Display;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_router_types::error::{AbortSignal, ModuleError};
use ibc_primitives::prelude::*;

use crate::CallbackType;

#[derive(Debug, Display)]
pub enum CallbacksError {
    /// host error: `{0}`
    Host(HostError),
    /// invalid callback data: `{description}`
    InvalidCallbackData { description: String },
    /// invalid callbacks configuration: `{description}`
    InvalidConfig { description: String },
    /// `{callback_type}` callback ran out of gas with an execution limit of `{execution_gas_limit}`
    CallbackOutOfGas {
        callback_type: CallbackType,
        execution_gas_limit: u64,
    },
    /// `{callback_type}` callback panicked: `{description}`
    CallbackPanic {
        callback_type: CallbackType,
        description: String,
    },
    /// `{callback_type}` callback failed: `{description}`
    Contract {
        callback_type: CallbackType,
        description: String,
    },
    /// callback aborted the transaction: `{0}`
    Abort(AbortSignal),
}

impl CallbacksError {
    pub fn invalid_callback_data<T: ToString>(description: T) -> Self {
        Self::InvalidCallbackData {
            description: description.to_string(),
        }
    }

    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        match self {
            Self::Abort(signal) => Some(signal),
            _ => None,
        }
    }
}

impl From<HostError> for CallbacksError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<AbortSignal> for CallbacksError {
    fn from(signal: AbortSignal) -> Self {
        Self::Abort(signal)
    }
}

/// Aborts stay aborts; everything else becomes an application error.
impl From<CallbacksError> for ModuleError {
    fn from(e: CallbacksError) -> Self {
        match e {
            CallbacksError::Abort(signal) => ModuleError::Abort(signal),
            e => ModuleError::app(e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CallbacksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            Self::Abort(e) => Some(e),
            _ => None,
        }
    }
}
