use ibc_primitives::prelude::*;

use crate::error::CallbacksError;

/// Static configuration of the callbacks middleware.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallbacksConfig {
    /// The most gas a callback can ask the relayer to pay for.
    max_callback_gas: u64,
}

impl CallbacksConfig {
    pub fn new(max_callback_gas: u64) -> Result<Self, CallbacksError> {
        let config = Self { max_callback_gas };
        config.validate()?;
        Ok(config)
    }

    pub fn max_callback_gas(&self) -> u64 {
        self.max_callback_gas
    }

    /// Checks a configuration obtained by deserialization.
    pub fn validate(&self) -> Result<(), CallbacksError> {
        if self.max_callback_gas == 0 {
            return Err(CallbacksError::InvalidConfig {
                description: "max callback gas cannot be zero".to_string(),
            });
        }
        Ok(())
    }
}
