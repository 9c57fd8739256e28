use core::fmt::{Display, Formatter, Result as FmtResult};

use ibc_primitives::prelude::*;

use crate::event::ModuleEvent;

/// Name a host gives to an application module it registers with its router.
///
/// Unlike a [`PortId`](ibc_eureka_core_host_types::identifiers::PortId) it
/// never leaves the chain.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Events and log lines an application produced while handling a callback.
///
/// Extras of a failed receive are still emitted, under error-prefixed kinds.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleExtras {
    pub events: Vec<ModuleEvent>,
    pub log: Vec<String>,
}

impl ModuleExtras {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends the events and logs of `other`, preserving order.
    pub fn merge(&mut self, other: ModuleExtras) {
        self.events.extend(other.events);
        self.log.extend(other.log);
    }
}

/// Outcome reported by an application for a received payload.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum PacketStatus {
    #[display(fmt = "success")]
    Success,
    #[display(fmt = "failure")]
    Failure,
    #[display(fmt = "async")]
    Async,
}

/// Result of an application's `on_recv_packet` callback.
///
/// The acknowledgement is only meaningful for [`PacketStatus::Success`]; a
/// failed receive is always acknowledged with the error sentinel and an
/// asynchronous one is acknowledged later.
#[cfg_attr(
    feature = "parity-scale-codec",
    derive(
        parity_scale_codec::Encode,
        parity_scale_codec::Decode,
        scale_info::TypeInfo
    )
)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecvPacketResult {
    pub status: PacketStatus,
    pub acknowledgement: Vec<u8>,
}

impl RecvPacketResult {
    pub fn success(acknowledgement: Vec<u8>) -> Self {
        Self {
            status: PacketStatus::Success,
            acknowledgement,
        }
    }

    pub fn failure() -> Self {
        Self {
            status: PacketStatus::Failure,
            acknowledgement: Vec::new(),
        }
    }

    pub fn async_ack() -> Self {
        Self {
            status: PacketStatus::Async,
            acknowledgement: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PacketStatus::Success
    }

    pub fn is_async(&self) -> bool {
        self.status == PacketStatus::Async
    }
}
