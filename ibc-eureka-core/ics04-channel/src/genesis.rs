//! Export and import of the packet state held for a set of clients.
use ibc_eureka_core_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::genesis::{ChannelGenesis, SequenceState};
use ibc_eureka_core_channel_types::packet::{Packet, Receipt};
use ibc_eureka_core_channel_types::proto::DecodeRaw;
use ibc_eureka_core_host::types::identifiers::ClientId;
use ibc_eureka_core_host::types::path::{
    AckPath, AsyncPacketPath, CommitmentPath, PacketStateKind, ReceiptPath, SeqSendPath,
};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_primitives::prelude::*;

/// Collects the packet state of every client in `client_ids`.
pub fn export_genesis<Ctx>(ctx: &Ctx, client_ids: &[ClientId]) -> Result<ChannelGenesis, ChannelError>
where
    Ctx: ValidationContext,
{
    let mut genesis = ChannelGenesis::default();

    for client_id in client_ids {
        genesis
            .commitments
            .extend(ctx.packet_states(PacketStateKind::Commitment, client_id)?);
        genesis
            .receipts
            .extend(ctx.packet_states(PacketStateKind::Receipt, client_id)?);
        genesis
            .acknowledgements
            .extend(ctx.packet_states(PacketStateKind::Acknowledgement, client_id)?);
        genesis
            .async_packets
            .extend(ctx.packet_states(PacketStateKind::AsyncPacket, client_id)?);

        if let Some(sequence) = ctx.get_next_sequence_send(&SeqSendPath::new(client_id))? {
            genesis.send_sequences.push(SequenceState {
                client_id: client_id.clone(),
                sequence,
            });
        }
    }

    Ok(genesis)
}

/// Writes every entry of `genesis` back under its key.
pub fn import_genesis<Ctx>(ctx: &mut Ctx, genesis: ChannelGenesis) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    for state in genesis.commitments {
        ctx.store_packet_commitment(
            &CommitmentPath::new(&state.client_id, state.sequence),
            PacketCommitment::try_from(state.data)?,
        )?;
    }

    for state in genesis.receipts {
        if state.data != Receipt.as_bytes() {
            return Err(ChannelError::invalid_packet(format!(
                "receipt of client `{}` with sequence `{}` holds an unexpected value",
                state.client_id, state.sequence
            )));
        }
        ctx.store_packet_receipt(&ReceiptPath::new(&state.client_id, state.sequence), Receipt)?;
    }

    for state in genesis.acknowledgements {
        ctx.store_packet_acknowledgement(
            &AckPath::new(&state.client_id, state.sequence),
            AcknowledgementCommitment::try_from(state.data)?,
        )?;
    }

    for state in genesis.async_packets {
        let packet = Packet::decode_raw(&state.data)?;
        ctx.store_async_packet(&AsyncPacketPath::new(&state.client_id, state.sequence), packet)?;
    }

    for SequenceState {
        client_id,
        sequence,
    } in genesis.send_sequences
    {
        ctx.store_next_sequence_send(&SeqSendPath::new(&client_id), sequence)?;
    }

    Ok(())
}
