//! Defines the top-level handler error type

use displaydoc::Display;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_router_types::error::{AbortSignal, RouterError};
use ibc_primitives::prelude::*;

/// Top-level error
#[derive(Debug, Display)]
pub enum HandlerError {
    /// ICS04 Channel error: {0}
    Channel(ChannelError),
    /// ICS26 Routing error: {0}
    Router(RouterError),
    /// ICS24 Host error: {0}
    Host(HostError),
}

impl HandlerError {
    /// The signal that must terminate the enclosing transaction, if any.
    ///
    /// This is the only place where an abort raised deep inside an
    /// application callback is surfaced to the host.
    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        match self {
            Self::Channel(e) => e.abort_signal(),
            _ => None,
        }
    }
}

impl From<ChannelError> for HandlerError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<RouterError> for HandlerError {
    fn from(e: RouterError) -> Self {
        Self::Router(e)
    }
}

impl From<HostError> for HandlerError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<HandlerError> for ChannelError {
    fn from(e: HandlerError) -> Self {
        match e {
            HandlerError::Channel(e) => e,
            HandlerError::Host(e) => ChannelError::Host(e),
            HandlerError::Router(e) => ChannelError::Host(HostError::Other {
                description: e.to_string(),
            }),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Channel(e) => Some(e),
            Self::Router(e) => Some(e),
            Self::Host(e) => Some(e),
        }
    }
}
