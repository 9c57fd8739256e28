//! Exposes the IBC Eureka handler entry points. These entry points route an
//! incoming packet message to the application bound to its payload port and
//! run the validation and execution logic of the matching packet handler.
//!
//! When processing a given message `M`, if any method in this library returns
//! an error, the runtime is expected to rollback all state modifications made
//! to the context (e.g. [`ExecutionContext`](ibc_eureka_core_host::ExecutionContext))
//! while processing `M`. An error carrying an
//! [`AbortSignal`](ibc_eureka_core_router::types::error::AbortSignal) must
//! additionally fail the whole transaction.
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

pub mod entrypoint;

/// Re-export IBC handler types from `ibc-eureka-core-handler-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_eureka_core_handler_types::*;
}
