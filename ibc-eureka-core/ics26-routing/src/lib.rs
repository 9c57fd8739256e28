//! This library contains necessary traits to implement an IBC Eureka
//! application module and route packets to it.
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

pub mod module;
pub mod router;

/// Re-exports router data structures from the `ibc-eureka-core-router-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_eureka_core_router_types::*;
}
