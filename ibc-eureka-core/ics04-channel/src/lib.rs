//! ICS-04: Packet semantics of IBC Eureka. Implements the send, receive,
//! acknowledge and timeout handlers, asynchronous acknowledgement writes,
//! and the query and genesis helpers over the packet store.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(feature = "std")]
extern crate std;

pub mod genesis;
pub mod handler;
pub mod query;

/// Re-exports ICS-04 data structures from the `ibc-eureka-core-channel-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_eureka_core_channel_types::*;
}
