pub mod context;
pub mod packet;

use ibc_eureka_core::primitives::Timestamp;

/// Sun Jan 01 2023 00:00:00 GMT+0000
pub fn year_2023() -> Timestamp {
    Timestamp::from_unix_timestamp(1_672_531_200, 0).expect("should be a valid time")
}
