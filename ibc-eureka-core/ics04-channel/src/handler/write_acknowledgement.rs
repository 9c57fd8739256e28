use ibc_eureka_core_channel_types::acknowledgement::Acknowledgement;
use ibc_eureka_core_channel_types::commitment::compute_ack_commitment;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::events::WriteAcknowledgement;
use ibc_eureka_core_channel_types::packet::Packet;
use ibc_eureka_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_eureka_core_host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core_host::types::path::{AckPath, AsyncPacketPath, ReceiptPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_primitives::prelude::*;

/// Writes the acknowledgement of a packet whose application chose to
/// acknowledge asynchronously, including all necessary validation.
///
/// Equivalent to calling [`write_acknowledgement_validate`], followed by
/// [`write_acknowledgement_execute`].
pub fn write_acknowledgement<ExecCtx>(
    ctx_b: &mut ExecCtx,
    client_id: &ClientId,
    sequence: Sequence,
    acknowledgement: Acknowledgement,
) -> Result<(), ChannelError>
where
    ExecCtx: ExecutionContext,
{
    write_acknowledgement_validate(ctx_b, client_id, sequence, &acknowledgement)?;
    write_acknowledgement_execute(ctx_b, client_id, sequence, acknowledgement)
}

pub fn write_acknowledgement_validate<ValCtx>(
    ctx_b: &ValCtx,
    client_id: &ClientId,
    sequence: Sequence,
    acknowledgement: &Acknowledgement,
) -> Result<(), ChannelError>
where
    ValCtx: ValidationContext,
{
    let packet = async_packet(ctx_b, client_id, sequence)?;

    validate_acknowledgement(ctx_b, &packet, acknowledgement)
}

/// A prior call to [`write_acknowledgement_validate`] MUST have succeeded.
pub fn write_acknowledgement_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    client_id: &ClientId,
    sequence: Sequence,
    acknowledgement: Acknowledgement,
) -> Result<(), ChannelError>
where
    ExecCtx: ExecutionContext,
{
    let packet = async_packet(ctx_b, client_id, sequence)?;

    store_acknowledgement(ctx_b, packet, acknowledgement)?;
    ctx_b.delete_async_packet(&AsyncPacketPath::new(client_id, sequence))?;

    Ok(())
}

fn async_packet<Ctx>(ctx_b: &Ctx, client_id: &ClientId, sequence: Sequence) -> Result<Packet, ChannelError>
where
    Ctx: ValidationContext,
{
    ctx_b
        .get_async_packet(&AsyncPacketPath::new(client_id, sequence))?
        .ok_or_else(|| ChannelError::AsyncPacketNotFound {
            client_id: client_id.clone(),
            sequence,
        })
}

/// Checks that `acknowledgement` can be written for the received `packet`.
pub(crate) fn validate_acknowledgement<Ctx>(
    ctx_b: &Ctx,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    let client_id = &packet.destination_client;
    let sequence = packet.sequence;

    if ctx_b
        .get_packet_acknowledgement(&AckPath::new(client_id, sequence))?
        .is_some()
    {
        return Err(ChannelError::AcknowledgementExists {
            client_id: client_id.clone(),
            sequence,
        });
    }

    if ctx_b
        .get_packet_receipt(&ReceiptPath::new(client_id, sequence))?
        .is_none()
    {
        return Err(ChannelError::invalid_packet(format!(
            "packet with sequence `{sequence}` has not been received on client `{client_id}`"
        )));
    }

    acknowledgement.validate()?;

    if acknowledgement.recv_success
        && acknowledgement.app_acknowledgements.len() != packet.payloads.len()
    {
        return Err(ChannelError::invalid_acknowledgement(format!(
            "{} application acknowledgements for {} payloads",
            acknowledgement.app_acknowledgements.len(),
            packet.payloads.len()
        )));
    }

    Ok(())
}

/// Commits to `acknowledgement` and emits the `write_acknowledgement` event.
pub(crate) fn store_acknowledgement<Ctx>(
    ctx_b: &mut Ctx,
    packet: Packet,
    acknowledgement: Acknowledgement,
) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    ctx_b.store_packet_acknowledgement(
        &AckPath::new(&packet.destination_client, packet.sequence),
        compute_ack_commitment(&acknowledgement),
    )?;

    ctx_b.log_message(format!(
        "success: packet write acknowledgement; client `{}`, sequence `{}`",
        packet.destination_client, packet.sequence
    ))?;

    let event = IbcEvent::WriteAcknowledgement(WriteAcknowledgement::new(packet, acknowledgement));
    ctx_b.emit_ibc_event(IbcEvent::Message(MessageEvent::channel()))?;
    ctx_b.emit_ibc_event(event)?;

    Ok(())
}
