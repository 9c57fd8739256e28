use ibc_eureka_core_host_types::identifiers::ClientId;
use ibc_primitives::prelude::*;
use ibc_primitives::Signer;

use super::validate_signer;
use crate::error::ChannelError;
use crate::packet::Payload;
use crate::timeout::TimeoutTimestamp;

/// Requests that `payloads` be sent through `source_client`.
///
/// The sequence and destination client are assigned by the sending chain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgSendPacket {
    pub source_client: ClientId,
    pub timeout_timestamp: TimeoutTimestamp,
    pub payloads: Vec<Payload>,
    pub signer: Signer,
}

impl MsgSendPacket {
    pub fn new(
        source_client: ClientId,
        timeout_timestamp: TimeoutTimestamp,
        payloads: Vec<Payload>,
        signer: Signer,
    ) -> Self {
        Self {
            source_client,
            timeout_timestamp,
            payloads,
            signer,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        self.source_client.validate()?;

        if self.timeout_timestamp.is_zero() {
            return Err(ChannelError::invalid_timeout("timeout cannot be 0"));
        }

        if self.payloads.len() != 1 {
            return Err(ChannelError::invalid_payload(format!(
                "payloads must contain exactly one payload, got {}",
                self.payloads.len()
            )));
        }
        for payload in &self.payloads {
            payload.validate_basic()?;
        }

        validate_signer(&self.signer)
    }
}
