use ibc_eureka_core_channel_types::commitment::compute_ack_commitment;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::events::AcknowledgePacket;
use ibc_eureka_core_channel_types::msgs::MsgAcknowledgement;
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_eureka_core_handler_types::msgs::ResponseResultType;
use ibc_eureka_core_host::app::BranchContext;
use ibc_eureka_core_host::types::path::{AckPath, CommitmentPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::module::Module;
use ibc_eureka_core_router::types::module::ModuleExtras;
use ibc_primitives::prelude::*;

use super::{
    charge_gas, emit_module_extras, has_matching_commitment, source_counterparty,
    verify_client_active,
};

pub fn acknowledgement_packet_validate<ValCtx>(
    ctx_a: &ValCtx,
    msg: &MsgAcknowledgement,
) -> Result<(), ChannelError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let counterparty = source_counterparty(ctx_a, packet)?;

    // The acknowledgement has already been relayed, or the packet was never
    // sent. `acknowledgement_packet_execute` reports it as a no-op.
    if !has_matching_commitment(ctx_a, packet)? {
        return Ok(());
    }

    verify_client_active(ctx_a, &packet.source_client)?;

    let acknowledgement = &msg.acknowledgement;
    if acknowledgement.recv_success
        && acknowledgement.app_acknowledgements.len() != packet.payloads.len()
    {
        return Err(ChannelError::invalid_acknowledgement(format!(
            "{} application acknowledgements for {} payloads",
            acknowledgement.app_acknowledgements.len(),
            packet.payloads.len()
        )));
    }

    // Verify that the counterparty wrote this acknowledgement
    {
        let ack_key = AckPath::new(&packet.destination_client, packet.sequence).to_key();
        let expected_commitment = compute_ack_commitment(acknowledgement);

        ctx_a
            .get_client_validation_context()
            .verify_membership(
                &packet.source_client,
                &msg.proof_height,
                &msg.proof_acked,
                &counterparty.merkle_path(&ack_key),
                expected_commitment.as_bytes(),
            )
            .map_err(|e| ChannelError::FailedProofVerification {
                sequence: packet.sequence,
                client_error: e,
            })?;
    }

    Ok(())
}

/// A prior call to [`acknowledgement_packet_validate`] MUST have succeeded.
pub fn acknowledgement_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgAcknowledgement,
) -> Result<ResponseResultType, ChannelError>
where
    ExecCtx: ExecutionContext,
{
    let MsgAcknowledgement {
        packet,
        acknowledgement,
        signer,
        ..
    } = msg;

    if !has_matching_commitment(ctx_a, &packet)? {
        ctx_a.log_message(format!(
            "no-op: packet with sequence `{}` already acknowledged or timed out",
            packet.sequence
        ))?;
        return Ok(ResponseResultType::Noop);
    }

    ctx_a.delete_packet_commitment(&CommitmentPath::new(&packet.source_client, packet.sequence))?;

    ctx_a.log_message(format!(
        "success: packet acknowledgement; client `{}`, sequence `{}`",
        packet.source_client, packet.sequence
    ))?;
    let event = IbcEvent::AcknowledgePacket(AcknowledgePacket::new(packet.clone()));
    ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::channel()))?;
    ctx_a.emit_ibc_event(event)?;

    let mut extras = ModuleExtras::empty();
    {
        let mut branch = BranchContext::with_remaining_gas(ctx_a.app_context_mut());
        for (index, payload) in packet.payloads.iter().enumerate() {
            // a failed receive hands every payload the error acknowledgement
            let app_acknowledgement = acknowledgement
                .app_acknowledgement(index)
                .ok_or_else(|| {
                    ChannelError::invalid_acknowledgement(format!(
                        "no application acknowledgement for payload {index}"
                    ))
                })?;

            let payload_extras = module.on_acknowledgement_packet(
                &mut branch,
                &packet.source_client,
                &packet.destination_client,
                packet.sequence,
                &app_acknowledgement,
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
