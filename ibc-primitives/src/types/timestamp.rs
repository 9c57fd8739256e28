//! Host and counterparty block times.
//!
//! Packet timeouts are expressed in whole unix seconds while light clients
//! and hosts report times with nanosecond precision, so [`Timestamp`] keeps
//! the full precision and exposes both views.

use core::fmt::{Display, Formatter, Result as FmtResult};
use core::ops::Add;
use core::time::Duration;

use displaydoc::Display;
use time::error::ComponentRange;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// A UTC point in time between the unix epoch and year 9999.
///
/// Every encoding (serde, borsh, SCALE) carries it as nanoseconds since the
/// unix epoch.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    #[cfg_attr(feature = "schema", schemars(with = "u64"))]
    time: PrimitiveDateTime,
}

impl Timestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Self, TimestampError> {
        Self::from_unix_nanos(i128::from(nanoseconds))
    }

    pub fn from_unix_timestamp(secs: u64, nanos: u32) -> Result<Self, TimestampError> {
        if u64::from(nanos) >= NANOS_PER_SECOND {
            return Err(TimestampError::DateOutOfRange);
        }
        let total = i128::from(secs) * i128::from(NANOS_PER_SECOND) + i128::from(nanos);
        Self::from_unix_nanos(total)
    }

    /// The current wall clock time, saturating at the latest representable
    /// date.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        Self::from_offset_date_time(OffsetDateTime::now_utc()).unwrap_or(Self {
            time: PrimitiveDateTime::MAX,
        })
    }

    pub fn nanoseconds(self) -> u64 {
        let nanos = self.time.assume_utc().unix_timestamp_nanos();
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }

    /// Whole seconds since the unix epoch, the unit packet timeouts use.
    pub fn unix_seconds(self) -> u64 {
        self.nanoseconds() / NANOS_PER_SECOND
    }

    fn from_unix_nanos(nanos: i128) -> Result<Self, TimestampError> {
        Self::from_offset_date_time(OffsetDateTime::from_unix_timestamp_nanos(nanos)?)
    }

    fn from_offset_date_time(t: OffsetDateTime) -> Result<Self, TimestampError> {
        let t = t.to_offset(UtcOffset::UTC);
        if !(1..=9999).contains(&t.year()) {
            return Err(TimestampError::DateOutOfRange);
        }
        Ok(Self {
            time: PrimitiveDateTime::new(t.date(), t.time()),
        })
    }
}

impl TryFrom<u64> for Timestamp {
    type Error = TimestampError;

    fn try_from(nanoseconds: u64) -> Result<Self, Self::Error> {
        Self::from_nanoseconds(nanoseconds)
    }
}

impl From<Timestamp> for u64 {
    fn from(t: Timestamp) -> Self {
        t.nanoseconds()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} UTC", self.time)
    }
}

/// Moves a timestamp forward, failing past year 9999.
impl Add<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let rhs = time::Duration::try_from(rhs).map_err(|_| TimestampError::DateOutOfRange)?;
        let time = self
            .time
            .checked_add(rhs)
            .ok_or(TimestampError::DateOutOfRange)?;
        Self::from_offset_date_time(time.assume_utc())
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshSerialize for Timestamp {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.nanoseconds(), writer)
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshDeserialize for Timestamp {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let nanoseconds = <u64 as borsh::BorshDeserialize>::deserialize_reader(reader)?;
        Self::from_nanoseconds(nanoseconds).map_err(|_| borsh::io::ErrorKind::InvalidData.into())
    }
}

#[cfg(feature = "parity-scale-codec")]
impl parity_scale_codec::Encode for Timestamp {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        parity_scale_codec::Encode::encode_to(&self.nanoseconds(), dest);
    }
}

#[cfg(feature = "parity-scale-codec")]
impl parity_scale_codec::Decode for Timestamp {
    fn decode<I: parity_scale_codec::Input>(
        input: &mut I,
    ) -> Result<Self, parity_scale_codec::Error> {
        let nanoseconds = <u64 as parity_scale_codec::Decode>::decode(input)?;
        Self::from_nanoseconds(nanoseconds)
            .map_err(|_| parity_scale_codec::Error::from("timestamp out of range"))
    }
}

#[cfg(feature = "parity-scale-codec")]
impl scale_info::TypeInfo for Timestamp {
    type Identity = u64;

    fn type_info() -> scale_info::Type {
        <u64 as scale_info::TypeInfo>::type_info()
    }
}

#[derive(Debug, Display, derive_more::From)]
pub enum TimestampError {
    /// date out of range
    DateOutOfRange,
    /// invalid time component: `{0}`
    Conversion(ComponentRange),
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Conversion(e) => Some(e),
            Self::DateOutOfRange => None,
        }
    }
}
