use displaydoc::Display;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_host_types::identifiers::PortId;
use ibc_primitives::prelude::*;

use crate::module::ModuleId;

/// Error type for the router module.
#[derive(Debug, Display)]
pub enum RouterError {
    /// host error: {0}
    Host(HostError),
    /// missing module
    MissingModule,
    /// no module bound to port `{port_id}`
    UnknownPort { port_id: PortId },
    /// module `{module_id}` is already registered
    DuplicateModule { module_id: ModuleId },
    /// port `{port_id}` is already bound to module `{module_id}`
    DuplicatePort { port_id: PortId, module_id: ModuleId },
}

impl From<HostError> for RouterError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

/// Signal that terminates the whole transaction instead of being handled as
/// an ordinary error.
///
/// Only the host boundary interprets it; everything in between carries it
/// unchanged.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum AbortSignal {
    /// out of gas: `{required_gas}` gas required
    OutOfGas { required_gas: u64 },
    /// execution panicked: `{description}`
    Panic { description: String },
}

/// Error returned by application callbacks.
#[derive(Debug, Display)]
pub enum ModuleError {
    /// application error: `{description}`
    App { description: String },
    /// execution aborted: `{0}`
    Abort(AbortSignal),
}

impl ModuleError {
    pub fn app<T: ToString>(description: T) -> Self {
        Self::App {
            description: description.to_string(),
        }
    }

    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        match self {
            Self::Abort(signal) => Some(signal),
            Self::App { .. } => None,
        }
    }
}

impl From<AbortSignal> for ModuleError {
    fn from(signal: AbortSignal) -> Self {
        Self::Abort(signal)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AbortSignal {}

#[cfg(feature = "std")]
impl std::error::Error for ModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Abort(e) => Some(e),
            _ => None,
        }
    }
}
