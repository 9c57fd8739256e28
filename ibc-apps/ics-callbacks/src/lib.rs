//! The IBC callbacks middleware.
//!
//! [`IbcCallbacksMiddleware`](middleware::IbcCallbacksMiddleware) wraps an
//! application and, for packets whose memo opts in, delivers lifecycle
//! callbacks to a contract through a [`ContractKeeper`](context::ContractKeeper).
//! Each callback runs on its own gas-limited branch of the application state
//! (see [`process_callback`](process::process_callback)).
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

#[cfg(test)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod context;
pub mod middleware;
pub mod process;

/// Re-exports the callbacks data structures from the `ibc-app-callbacks-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_app_callbacks_types::*;
}
