//! ICS-02: Client capability consumed by the IBC Eureka packet core.
//!
//! Light-client algorithms are not implemented here; the packet core only
//! needs a verifier that can answer status, height and timestamp queries and
//! check (non-)membership proofs against a counterparty's state.
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

pub mod context;

/// Re-exports ICS-02 data structures from the `ibc-eureka-core-client-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_eureka_core_client_types::*;
}
