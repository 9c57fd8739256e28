//! Data structures of the IBC callbacks middleware, which lets packet senders
//! and receivers opt in to contract callbacks through the packet memo.
//!
//! The memo carries the callback metadata as JSON:
//!
//! ```json
//! {
//!     "src_callback": { "address": "...", "gas_limit": "100000", "calldata": "beef" },
//!     "dest_callback": { "address": "..." }
//! }
//! ```
//!
//! `gas_limit` is a decimal string and `calldata` a hex string; both are
//! optional.
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

#[cfg(any(test, feature = "std"))]
extern crate std;

mod callback;
mod config;

pub use callback::*;
pub use config::*;
pub mod error;
pub mod events;

/// Module identifier of the callbacks middleware.
pub const MODULE_ID_STR: &str = "ibccallbacks";

/// Memo key holding the callback run on the source chain.
pub const SOURCE_CALLBACK_KEY: &str = "src_callback";

/// Memo key holding the callback run on the destination chain.
pub const DESTINATION_CALLBACK_KEY: &str = "dest_callback";

pub const CALLBACK_ADDRESS_KEY: &str = "address";

pub const USER_DEFINED_GAS_LIMIT_KEY: &str = "gas_limit";

pub const CALLDATA_KEY: &str = "calldata";
