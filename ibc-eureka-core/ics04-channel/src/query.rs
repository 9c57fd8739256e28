//! Read-only queries over the packet store, as served to relayers.
use ibc_eureka_core_channel_types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::packet::PacketState;
use ibc_eureka_core_host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core_host::types::path::{
    AckPath, CommitmentPath, PacketStateKind, ReceiptPath, SeqSendPath,
};
use ibc_eureka_core_host::ValidationContext;
use ibc_primitives::prelude::*;

/// Sequence the next packet sent through `client_id` will carry.
pub fn next_sequence_send<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<Sequence, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx
        .get_next_sequence_send(&SeqSendPath::new(client_id))?
        .unwrap_or(Sequence::FIRST))
}

pub fn packet_commitment<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    sequence: Sequence,
) -> Result<PacketCommitment, ChannelError>
where
    Ctx: ValidationContext,
{
    ctx.get_packet_commitment(&CommitmentPath::new(client_id, sequence))?
        .ok_or_else(|| ChannelError::PacketCommitmentNotFound {
            client_id: client_id.clone(),
            sequence,
        })
}

pub fn packet_acknowledgement<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    sequence: Sequence,
) -> Result<AcknowledgementCommitment, ChannelError>
where
    Ctx: ValidationContext,
{
    ctx.get_packet_acknowledgement(&AckPath::new(client_id, sequence))?
        .ok_or_else(|| ChannelError::AcknowledgementNotFound {
            client_id: client_id.clone(),
            sequence,
        })
}

/// Returns whether a receipt is stored for `(client_id, sequence)`.
pub fn packet_receipt<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    sequence: Sequence,
) -> Result<bool, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx
        .get_packet_receipt(&ReceiptPath::new(client_id, sequence))?
        .is_some())
}

pub fn packet_commitments<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<Vec<PacketState>, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx.packet_states(PacketStateKind::Commitment, client_id)?)
}

pub fn packet_acknowledgements<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
) -> Result<Vec<PacketState>, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx.packet_states(PacketStateKind::Acknowledgement, client_id)?)
}

pub fn packet_receipts<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<Vec<PacketState>, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx.packet_states(PacketStateKind::Receipt, client_id)?)
}

pub fn async_packets<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<Vec<PacketState>, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx.packet_states(PacketStateKind::AsyncPacket, client_id)?)
}

/// Filters `sequences` down to those `client_id` has not received yet.
///
/// Queried on the destination chain; a relayer uses it to skip packets that
/// were already delivered.
pub fn unreceived_packets<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    sequences: &[Sequence],
) -> Result<Vec<Sequence>, ChannelError>
where
    Ctx: ValidationContext,
{
    let mut unreceived = Vec::new();
    for &sequence in sequences {
        if !packet_receipt(ctx, client_id, sequence)? {
            unreceived.push(sequence);
        }
    }
    Ok(unreceived)
}

/// Filters `sequences` down to those whose send commitment on `client_id`
/// is still stored, i.e. whose acknowledgement has not been relayed.
///
/// Queried on the source chain.
pub fn unreceived_acks<Ctx>(
    ctx: &Ctx,
    client_id: &ClientId,
    sequences: &[Sequence],
) -> Result<Vec<Sequence>, ChannelError>
where
    Ctx: ValidationContext,
{
    let mut unreceived = Vec::new();
    for &sequence in sequences {
        if ctx
            .get_packet_commitment(&CommitmentPath::new(client_id, sequence))?
            .is_some()
        {
            unreceived.push(sequence);
        }
    }
    Ok(unreceived)
}
