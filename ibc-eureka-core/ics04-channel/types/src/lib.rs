//! Implementation of the IBC Eureka packet data structures: packets and their
//! payloads, acknowledgements, the commitment codec, message types and the
//! events emitted by the packet lifecycle handlers.
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

pub mod acknowledgement;
pub mod commitment;
pub mod error;
pub mod events;
pub mod genesis;
pub mod msgs;
pub mod packet;
pub mod proto;
pub mod timeout;

mod counterparty;
pub use counterparty::*;
