//! Re-exports data structures and implementations of the IBC Eureka packet
//! core.
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

/// Re-exports IBC handler entrypoints from the `ibc-eureka-core-handler` crate
/// for added convenience.
pub mod entrypoint {
    #[doc(inline)]
    pub use ibc_eureka_core_handler::entrypoint::*;
}

/// Re-exports IBC primitive types from the `ibc-primitives` crate
pub mod primitives {
    #[doc(inline)]
    pub use ibc_primitives::*;
}

/// Re-exports ICS-02 implementation from the `ibc-eureka-core-client` crate
pub mod client {
    #[doc(inline)]
    pub use ibc_eureka_core_client::*;
}

/// Re-exports ICS-04 implementation from the `ibc-eureka-core-channel` crate
pub mod channel {
    #[doc(inline)]
    pub use ibc_eureka_core_channel::*;
}

/// Re-exports ICS-23 data structures from the `ibc-eureka-core-commitment-types` crate
pub mod commitment_types {
    #[doc(inline)]
    pub use ibc_eureka_core_commitment_types::*;
}

/// Re-exports ICS-24 implementation from the `ibc-eureka-core-host` crate
pub mod host {
    #[doc(inline)]
    pub use ibc_eureka_core_host::*;
}

/// Re-exports ICS-25 implementation from the `ibc-eureka-core-handler` crate
pub mod handler {
    #[doc(inline)]
    pub use ibc_eureka_core_handler::*;
}

/// Re-exports ICS-26 implementation from the `ibc-eureka-core-router` crate
pub mod router {
    #[doc(inline)]
    pub use ibc_eureka_core_router::*;
}
