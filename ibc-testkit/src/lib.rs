//! Testing tools for the IBC Eureka packet core: an in-memory host chain, a
//! mock light-client verifier, mock applications and a relayer driving
//! packets between two hosts.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod context;
pub mod fixtures;
pub mod relayer;
pub mod store;
pub mod testapp;
