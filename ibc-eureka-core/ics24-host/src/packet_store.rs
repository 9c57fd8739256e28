//! Typed access to the packet-core state held in a [`KvStore`].
//!
//! Hosts that keep their IBC state in a plain key-value store can implement
//! the packet getters and setters of [`ValidationContext`] and
//! [`ExecutionContext`] by delegating to a [`PacketStore`].
//!
//! [`ValidationContext`]: crate::ValidationContext
//! [`ExecutionContext`]: crate::ExecutionContext
use ibc_eureka_core_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_eureka_core_channel_types::packet::{Packet, PacketState, Receipt};
use ibc_eureka_core_channel_types::proto::{DecodeRaw, EncodeRaw};
use ibc_eureka_core_channel_types::Counterparty;
use ibc_eureka_core_host_types::error::HostError;
use ibc_eureka_core_host_types::identifiers::{ClientId, Sequence};
use ibc_eureka_core_host_types::path::{
    extract_sequence_from_key, AckPath, AsyncPacketPath, CommitmentPath, CounterpartyPath,
    PacketStateKind, ReceiptPath, SeqSendPath,
};
use ibc_primitives::prelude::*;

use crate::store::KvStore;

#[derive(Clone, Debug, Default)]
pub struct PacketStore<S> {
    store: S,
}

impl<S: KvStore> PacketStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn counterparty(&self, path: &CounterpartyPath) -> Result<Option<Counterparty>, HostError> {
        self.store
            .get(&path.to_key())?
            .map(|bytes| Counterparty::decode_raw(&bytes))
            .transpose()
            .map_err(HostError::from)
    }

    pub fn set_counterparty(
        &mut self,
        path: &CounterpartyPath,
        counterparty: &Counterparty,
    ) -> Result<(), HostError> {
        self.store.set(path.to_key(), counterparty.encode_raw())
    }

    pub fn next_sequence_send(&self, path: &SeqSendPath) -> Result<Option<Sequence>, HostError> {
        let Some(bytes) = self.store.get(&path.to_key())? else {
            return Ok(None);
        };

        let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
            HostError::failed_to_parse(format!(
                "next sequence send of `{}` must be 8 bytes, got {}",
                path.0,
                bytes.len()
            ))
        })?;

        Ok(Some(Sequence::from_be_bytes(raw)))
    }

    pub fn set_next_sequence_send(
        &mut self,
        path: &SeqSendPath,
        sequence: Sequence,
    ) -> Result<(), HostError> {
        self.store.set(path.to_key(), sequence.to_be_bytes().to_vec())
    }

    pub fn packet_commitment(
        &self,
        path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, HostError> {
        self.store
            .get(&path.to_key())?
            .map(|bytes| {
                PacketCommitment::try_from(bytes)
                    .map_err(|e| HostError::failed_to_parse(format!("{path}: {e}")))
            })
            .transpose()
    }

    pub fn set_packet_commitment(
        &mut self,
        path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), HostError> {
        self.store.set(path.to_key(), commitment.into_vec())
    }

    pub fn delete_packet_commitment(&mut self, path: &CommitmentPath) -> Result<(), HostError> {
        self.store.delete(&path.to_key())
    }

    pub fn packet_receipt(&self, path: &ReceiptPath) -> Result<Option<Receipt>, HostError> {
        match self.store.get(&path.to_key())? {
            None => Ok(None),
            Some(bytes) if bytes == Receipt.as_bytes() => Ok(Some(Receipt)),
            Some(bytes) => Err(HostError::failed_to_parse(format!(
                "{path}: unexpected receipt value {bytes:?}"
            ))),
        }
    }

    pub fn set_packet_receipt(&mut self, path: &ReceiptPath, receipt: Receipt) -> Result<(), HostError> {
        self.store.set(path.to_key(), receipt.as_bytes().to_vec())
    }

    pub fn packet_acknowledgement(
        &self,
        path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, HostError> {
        self.store
            .get(&path.to_key())?
            .map(|bytes| {
                AcknowledgementCommitment::try_from(bytes)
                    .map_err(|e| HostError::failed_to_parse(format!("{path}: {e}")))
            })
            .transpose()
    }

    pub fn set_packet_acknowledgement(
        &mut self,
        path: &AckPath,
        commitment: AcknowledgementCommitment,
    ) -> Result<(), HostError> {
        self.store.set(path.to_key(), commitment.into_vec())
    }

    pub fn async_packet(&self, path: &AsyncPacketPath) -> Result<Option<Packet>, HostError> {
        self.store
            .get(&path.to_key())?
            .map(|bytes| Packet::decode_raw(&bytes))
            .transpose()
            .map_err(HostError::from)
    }

    pub fn set_async_packet(&mut self, path: &AsyncPacketPath, packet: &Packet) -> Result<(), HostError> {
        self.store.set(path.to_key(), packet.encode_raw())
    }

    pub fn delete_async_packet(&mut self, path: &AsyncPacketPath) -> Result<(), HostError> {
        self.store.delete(&path.to_key())
    }

    /// Lists every entry of `kind` stored for `client_id`, by ascending
    /// sequence.
    pub fn packet_states(
        &self,
        kind: PacketStateKind,
        client_id: &ClientId,
    ) -> Result<Vec<PacketState>, HostError> {
        let prefix = kind.prefix(client_id);

        self.store
            .prefix_iter(&prefix)?
            .into_iter()
            .map(|(key, data)| {
                let sequence = extract_sequence_from_key(&key, &prefix)?;
                Ok::<_, HostError>(PacketState::new(client_id.clone(), sequence, data))
            })
            .collect()
    }
}
