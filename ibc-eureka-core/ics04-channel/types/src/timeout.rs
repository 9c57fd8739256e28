//! Defines the timeout timestamp carried by every packet.
use core::fmt::{Display, Error as FmtError, Formatter};
use core::time::Duration;

use ibc_primitives::Timestamp;

/// Upper bound on how far in the future a sender may place a packet timeout.
pub const MAX_TIMEOUT_DELTA: Duration = Duration::from_secs(24 * 60 * 60);

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Packet timeout expressed in unix seconds of the destination chain.
///
/// Counterparty consensus timestamps are tracked in nanoseconds, so every
/// comparison converts the timeout to nanoseconds first.
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
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeoutTimestamp(u64);

impl TimeoutTimestamp {
    pub const fn from_unix_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    pub fn seconds(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn nanoseconds(&self) -> u64 {
        self.0.saturating_mul(NANOS_PER_SECOND)
    }

    /// Returns `true` once `now` has reached the timeout.
    pub fn has_expired(&self, now: &Timestamp) -> bool {
        now.nanoseconds() >= self.nanoseconds()
    }

    /// Returns `true` if the timeout lies further than `max_delta` past `now`.
    pub fn exceeds_delta(&self, now: &Timestamp, max_delta: Duration) -> bool {
        u128::from(self.nanoseconds()) > u128::from(now.nanoseconds()) + max_delta.as_nanos()
    }
}

impl From<u64> for TimeoutTimestamp {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<TimeoutTimestamp> for u64 {
    fn from(timeout: TimeoutTimestamp) -> Self {
        timeout.0
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}
