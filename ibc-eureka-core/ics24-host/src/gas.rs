//! Gas metering for application execution.
use displaydoc::Display;

/// Error raised when a meter is charged past its limit.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum GasError {
    /// out of gas: consumed `{consumed}` with a limit of `{limit}`
    OutOfGas { limit: u64, consumed: u64 },
}

#[cfg(feature = "std")]
impl std::error::Error for GasError {}

/// Counts gas consumed against a fixed limit.
///
/// Charging past the limit records the full amount and fails, so that
/// `consumed` always reflects what the execution asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// A meter whose limit can never be reached in practice.
    pub fn infinite() -> Self {
        Self::new(u64::MAX)
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Gas left before the limit; zero once exhausted.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    pub fn is_out_of_gas(&self) -> bool {
        self.consumed > self.limit
    }

    pub fn consume(&mut self, amount: u64) -> Result<(), GasError> {
        self.consumed = self.consumed.saturating_add(amount);
        if self.is_out_of_gas() {
            return Err(GasError::OutOfGas {
                limit: self.limit,
                consumed: self.consumed,
            });
        }
        Ok(())
    }
}
