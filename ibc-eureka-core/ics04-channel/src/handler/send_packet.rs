use ibc_eureka_core_channel_types::commitment::compute_packet_commitment;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::events::SendPacket;
use ibc_eureka_core_channel_types::msgs::MsgSendPacket;
use ibc_eureka_core_channel_types::packet::Packet;
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_eureka_core_host::app::BranchContext;
use ibc_eureka_core_host::types::identifiers::Sequence;
use ibc_eureka_core_host::types::path::{CommitmentPath, SeqSendPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::module::Module;
use ibc_eureka_core_router::types::module::ModuleExtras;
use ibc_primitives::prelude::*;

use super::{charge_gas, counterparty_of, emit_module_extras, verify_client_active};

pub fn send_packet_validate<ValCtx>(ctx_a: &ValCtx, msg: &MsgSendPacket) -> Result<(), ChannelError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    counterparty_of(ctx_a, &msg.source_client)?;

    let packet = build_packet(ctx_a, msg)?;
    packet.validate_basic()?;

    let now = ctx_a.host_timestamp()?;
    if msg.timeout_timestamp.has_expired(&now) {
        return Err(ChannelError::TimeoutElapsed {
            timeout: msg.timeout_timestamp,
            timestamp: now,
        });
    }
    if msg
        .timeout_timestamp
        .exceeds_delta(&now, ctx_a.max_timeout_delta())
    {
        return Err(ChannelError::invalid_timeout(format!(
            "timeout `{}` is more than {:?} after host time `{now}`",
            msg.timeout_timestamp,
            ctx_a.max_timeout_delta()
        )));
    }

    verify_client_active(ctx_a, &msg.source_client)?;

    // the timeout must not have elapsed on the destination chain either, as
    // far as the client tracking it knows
    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let latest_height = client_val_ctx_a.client_latest_height(&msg.source_client)?;
    let latest_timestamp =
        client_val_ctx_a.client_timestamp_at_height(&msg.source_client, &latest_height)?;

    if packet.timeout_timestamp.has_expired(&latest_timestamp) {
        return Err(ChannelError::TimeoutElapsed {
            timeout: packet.timeout_timestamp,
            timestamp: latest_timestamp,
        });
    }

    Ok(())
}

/// Sends the packet built from `msg` and returns its sequence.
///
/// A prior call to [`send_packet_validate`] MUST have succeeded.
pub fn send_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgSendPacket,
) -> Result<Sequence, ChannelError>
where
    ExecCtx: ExecutionContext,
{
    let packet = build_packet(ctx_a, &msg)?;
    let sequence = packet.sequence;

    let mut extras = ModuleExtras::empty();
    {
        let mut branch = BranchContext::with_remaining_gas(ctx_a.app_context_mut());
        for payload in &packet.payloads {
            let payload_extras = module.on_send_packet(
                &mut branch,
                &packet.source_client,
                &packet.destination_client,
                sequence,
                payload,
                &msg.signer,
            );
            match payload_extras {
                Ok(payload_extras) => extras.merge(payload_extras),
                Err(e) => {
                    let consumed = branch.discard();
                    charge_gas(ctx_a, consumed)?;
                    return Err(e.into());
                }
            }
        }
        let consumed = branch.commit()?;
        charge_gas(ctx_a, consumed)?;
    }

    let next_sequence = sequence.checked_next().ok_or_else(|| {
        ChannelError::invalid_packet(format!(
            "sequences of client `{}` are exhausted",
            packet.source_client
        ))
    })?;
    ctx_a.store_next_sequence_send(&SeqSendPath::new(&packet.source_client), next_sequence)?;
    ctx_a.store_packet_commitment(
        &CommitmentPath::new(&packet.source_client, sequence),
        compute_packet_commitment(&packet),
    )?;

    // emit events and logs
    {
        ctx_a.log_message(format!(
            "success: packet send; client `{}`, sequence `{sequence}`",
            packet.source_client
        ))?;
        let event = IbcEvent::SendPacket(SendPacket::new(packet));
        ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::channel()))?;
        ctx_a.emit_ibc_event(event)?;

        emit_module_extras(ctx_a, extras)?;
    }

    Ok(sequence)
}

/// Builds the packet `msg` would send, with the next free sequence of its
/// source client.
fn build_packet<Ctx>(ctx_a: &Ctx, msg: &MsgSendPacket) -> Result<Packet, ChannelError>
where
    Ctx: ValidationContext,
{
    let counterparty = counterparty_of(ctx_a, &msg.source_client)?;

    let sequence = ctx_a
        .get_next_sequence_send(&SeqSendPath::new(&msg.source_client))?
        .unwrap_or(Sequence::FIRST);

    Ok(Packet::new(
        sequence,
        msg.source_client.clone(),
        counterparty.client_id,
        msg.timeout_timestamp,
        msg.payloads.clone(),
    ))
}
