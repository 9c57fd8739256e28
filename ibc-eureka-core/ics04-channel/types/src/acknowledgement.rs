//! Defines the acknowledgement written by the receiving chain.
use ibc_primitives::prelude::*;
use sha2::{Digest, Sha256};

use crate::error::ChannelError;

const ERROR_ACKNOWLEDGEMENT_PREIMAGE: &[u8] = b"UNIVERSAL_ERROR_ACKNOWLEDGEMENT";

/// The app acknowledgement that stands for a failed receive.
///
/// Handed to the sending application in place of a real acknowledgement when
/// the receive failed, and forbidden as a successful app acknowledgement.
pub fn error_acknowledgement() -> [u8; 32] {
    Sha256::digest(ERROR_ACKNOWLEDGEMENT_PREIMAGE).into()
}

/// Acknowledgement of a received packet.
///
/// A successful receive carries one app acknowledgement per payload. A failed
/// receive carries none; its commitment is a fixed sentinel.
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
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Acknowledgement {
    pub recv_success: bool,
    pub app_acknowledgements: Vec<Vec<u8>>,
}

impl Acknowledgement {
    pub fn success(app_acknowledgements: Vec<Vec<u8>>) -> Self {
        Self {
            recv_success: true,
            app_acknowledgements,
        }
    }

    pub fn failure() -> Self {
        Self {
            recv_success: false,
            app_acknowledgements: Vec::new(),
        }
    }

    /// The acknowledgement the application on the sending side sees for the
    /// payload at `index`.
    pub fn app_acknowledgement(&self, index: usize) -> Option<Vec<u8>> {
        if self.recv_success {
            self.app_acknowledgements.get(index).cloned()
        } else {
            Some(error_acknowledgement().to_vec())
        }
    }

    pub fn validate(&self) -> Result<(), ChannelError> {
        if !self.recv_success {
            if !self.app_acknowledgements.is_empty() {
                return Err(ChannelError::invalid_acknowledgement(
                    "failed acknowledgement cannot carry app acknowledgements",
                ));
            }
            return Ok(());
        }

        if self.app_acknowledgements.is_empty() {
            return Err(ChannelError::invalid_acknowledgement(
                "app acknowledgements cannot be empty",
            ));
        }

        let sentinel = error_acknowledgement();
        for ack in &self.app_acknowledgements {
            if ack.is_empty() {
                return Err(ChannelError::invalid_acknowledgement(
                    "app acknowledgement cannot be empty",
                ));
            }
            if ack.as_slice() == sentinel.as_slice() {
                return Err(ChannelError::invalid_acknowledgement(
                    "app acknowledgement cannot be the error acknowledgement",
                ));
            }
        }

        Ok(())
    }
}
