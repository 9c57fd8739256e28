//! ICS-24: Host defines the minimal set of interfaces that a state machine
//! hosting an IBC Eureka enabled chain must implement: access to the packet
//! state, the application state the packet core branches for callbacks, and
//! gas metering.
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

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod app;
pub mod gas;
pub mod packet_store;
pub mod store;

mod context;
pub use context::*;

/// Re-exports ICS-24 data structures from the `ibc-eureka-core-host-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_eureka_core_host_types::*;
}
