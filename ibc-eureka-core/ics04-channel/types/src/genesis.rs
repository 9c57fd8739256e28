//! Packet state exported from and imported into the packet store.
use ibc_eureka_core_host_types::identifiers::{ClientId, Sequence};
use ibc_primitives::prelude::*;

use crate::packet::PacketState;

/// Next send sequence of a client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceState {
    pub client_id: ClientId,
    pub sequence: Sequence,
}

/// Snapshot of every piece of packet state held for a set of clients.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelGenesis {
    pub acknowledgements: Vec<PacketState>,
    pub commitments: Vec<PacketState>,
    pub receipts: Vec<PacketState>,
    pub async_packets: Vec<PacketState>,
    pub send_sequences: Vec<SequenceState>,
}

impl ChannelGenesis {
    pub fn is_empty(&self) -> bool {
        self.acknowledgements.is_empty()
            && self.commitments.is_empty()
            && self.receipts.is_empty()
            && self.async_packets.is_empty()
            && self.send_sequences.is_empty()
    }
}
