use displaydoc::Display;
use ibc_eureka_core::client::types::error::ClientError;
use ibc_eureka_core::handler::types::error::HandlerError;
use ibc_eureka_core::primitives::prelude::*;

#[derive(Debug, Display)]
pub enum RelayerError {
    /// transaction processing by modules failed error: `{0}`
    TransactionFailed(HandlerError),
    /// expected event was not emitted: `{description}`
    MissingEvent { description: String },
    /// client error: `{0}`
    Client(ClientError),
}

impl From<ClientError> for RelayerError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::TransactionFailed(e) => Some(e),
            Self::Client(e) => Some(e),
            _ => None,
        }
    }
}
