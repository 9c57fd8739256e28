//! Defines identifier types

mod client_id;
mod port_id;
mod sequence;

pub use client_id::ClientId;
pub use port_id::PortId;
pub use sequence::Sequence;
