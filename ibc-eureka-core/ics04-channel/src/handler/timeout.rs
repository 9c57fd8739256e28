use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::events::TimeoutPacket;
use ibc_eureka_core_channel_types::msgs::MsgTimeout;
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_eureka_core_handler_types::msgs::ResponseResultType;
use ibc_eureka_core_host::app::BranchContext;
use ibc_eureka_core_host::types::path::{CommitmentPath, ReceiptPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::module::Module;
use ibc_eureka_core_router::types::module::ModuleExtras;
use ibc_primitives::prelude::*;

use super::{charge_gas, emit_module_extras, has_matching_commitment, source_counterparty};

pub fn timeout_packet_validate<ValCtx>(ctx_a: &ValCtx, msg: &MsgTimeout) -> Result<(), ChannelError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let counterparty = source_counterparty(ctx_a, packet)?;

    // The timeout has already been relayed, or the packet was acknowledged.
    // `timeout_packet_execute` reports it as a no-op.
    if !has_matching_commitment(ctx_a, packet)? {
        return Ok(());
    }

    let client_val_ctx_a = ctx_a.get_client_validation_context();

    let proof_timestamp =
        client_val_ctx_a.client_timestamp_at_height(&packet.source_client, &msg.proof_height)?;
    if !packet.timeout_timestamp.has_expired(&proof_timestamp) {
        return Err(ChannelError::TimeoutNotReached {
            timeout: packet.timeout_timestamp,
            proof_timestamp,
        });
    }

    // Verify that the counterparty never received the packet
    {
        let receipt_key = ReceiptPath::new(&packet.destination_client, packet.sequence).to_key();

        client_val_ctx_a
            .verify_non_membership(
                &packet.source_client,
                &msg.proof_height,
                &msg.proof_unreceived,
                &counterparty.merkle_path(&receipt_key),
            )
            .map_err(|e| ChannelError::FailedProofVerification {
                sequence: packet.sequence,
                client_error: e,
            })?;
    }

    Ok(())
}

/// A prior call to [`timeout_packet_validate`] MUST have succeeded.
pub fn timeout_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgTimeout,
) -> Result<ResponseResultType, ChannelError>
where
    ExecCtx: ExecutionContext,
{
    let MsgTimeout { packet, signer, .. } = msg;

    if !has_matching_commitment(ctx_a, &packet)? {
        ctx_a.log_message(format!(
            "no-op: packet with sequence `{}` already acknowledged or timed out",
            packet.sequence
        ))?;
        return Ok(ResponseResultType::Noop);
    }

    ctx_a.delete_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))?;

    ctx_a.log_message(format!(
        "success: packet timeout; client `{}`, sequence `{}`",
        packet.source_client, packet.sequence
    ))?;
    let event = IbcEvent::TimeoutPacket(TimeoutPacket::new(packet.clone()));
    ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::channel()))?;
    ctx_a.emit_ibc_event(event)?;

    let mut extras = ModuleExtras::empty();
    {
        let mut branch = BranchContext::with_remaining_gas(ctx_a.app_context_mut());
        for payload in &packet.payloads {
            let payload_extras = module.on_timeout_packet(
                &mut branch,
                &packet.source_client,
                &packet.destination_client,
                packet.sequence,
                payload,
                &signer,
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

    emit_module_extras(ctx_a, extras)?;

    Ok(ResponseResultType::Success)
}
