use ibc_eureka_core_channel_types::acknowledgement::{error_acknowledgement, Acknowledgement};
use ibc_eureka_core_channel_types::commitment::compute_packet_commitment;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::events::ReceivePacket;
use ibc_eureka_core_channel_types::msgs::MsgRecvPacket;
use ibc_eureka_core_channel_types::packet::{Packet, Receipt};
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_eureka_core_handler_types::msgs::ResponseResultType;
use ibc_eureka_core_host::app::BranchContext;
use ibc_eureka_core_host::types::path::{AsyncPacketPath, CommitmentPath, ReceiptPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::module::Module;
use ibc_eureka_core_router::types::module::PacketStatus;
use ibc_primitives::prelude::*;

use super::write_acknowledgement::{store_acknowledgement, validate_acknowledgement};
use super::{charge_gas, counterparty_of, emit_error_extras, emit_module_extras};

pub fn recv_packet_validate<ValCtx>(ctx_b: &ValCtx, msg: &MsgRecvPacket) -> Result<(), ChannelError>
where
    ValCtx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;

    let counterparty = counterparty_of(ctx_b, &packet.destination_client)?;
    if counterparty.client_id != packet.source_client {
        return Err(ChannelError::InvalidChannelIdentifier {
            expected: counterparty.client_id,
            actual: packet.source_client.clone(),
        });
    }

    // Another relayer may have already relayed the packet. This is not an
    // error: `recv_packet_execute` reports it as a no-op.
    if is_received(ctx_b, packet)? {
        return Ok(());
    }

    let now = ctx_b.host_timestamp()?;
    if packet.timeout_timestamp.has_expired(&now) {
        return Err(ChannelError::TimeoutElapsed {
            timeout: packet.timeout_timestamp,
            timestamp: now,
        });
    }

    // Verify that the counterparty committed to this exact packet
    {
        let commitment_key = CommitmentPath::new(&packet.source_client, packet.sequence).to_key();
        let expected_commitment = compute_packet_commitment(packet);

        ctx_b
            .get_client_validation_context()
            .verify_membership(
                &packet.destination_client,
                &msg.proof_height,
                &msg.proof_commitment,
                &counterparty.merkle_path(&commitment_key),
                expected_commitment.as_bytes(),
            )
            .map_err(|e| ChannelError::FailedProofVerification {
                sequence: packet.sequence,
                client_error: e,
            })?;
    }

    Ok(())
}

/// Receives the packet and hands each payload to the application.
///
/// A prior call to [`recv_packet_validate`] MUST have succeeded. Returns
/// `Failure` when the application failed to process the packet; the packet
/// is still received and acknowledged with the error acknowledgement.
pub fn recv_packet_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgRecvPacket,
) -> Result<ResponseResultType, ChannelError>
where
    ExecCtx: ExecutionContext,
{
    let MsgRecvPacket { packet, signer, .. } = msg;

    if is_received(ctx_b, &packet)? {
        ctx_b.log_message(format!(
            "no-op: packet with sequence `{}` already received on client `{}`",
            packet.sequence, packet.destination_client
        ))?;
        emit_recv_packet(ctx_b, &packet)?;
        return Ok(ResponseResultType::Noop);
    }

    ctx_b.store_packet_receipt(
        &ReceiptPath::new(&packet.destination_client, packet.sequence),
        Receipt,
    )?;
    ctx_b.log_message(format!(
        "success: packet receive; client `{}`, sequence `{}`",
        packet.destination_client, packet.sequence
    ))?;
    emit_recv_packet(ctx_b, &packet)?;

    let mut app_acknowledgements = Vec::with_capacity(packet.payloads.len());
    let mut recv_success = true;
    let mut is_async = false;

    for payload in &packet.payloads {
        let mut branch = BranchContext::with_remaining_gas(ctx_b.app_context_mut());

        let callback_result = module.on_recv_packet(
            &mut branch,
            &packet.source_client,
            &packet.destination_client,
            packet.sequence,
            payload,
            &signer,
        );

        let (extras, recv_result) = match callback_result {
            Ok(outcome) => outcome,
            Err(e) => {
                let consumed = branch.discard();
                charge_gas(ctx_b, consumed)?;
                return Err(e.into());
            }
        };

        if recv_result.status == PacketStatus::Failure {
            let consumed = branch.discard();
            charge_gas(ctx_b, consumed)?;
            emit_error_extras(ctx_b, extras)?;
            recv_success = false;
            break;
        }

        if recv_result.acknowledgement == error_acknowledgement() {
            let consumed = branch.discard();
            charge_gas(ctx_b, consumed)?;
            return Err(ChannelError::invalid_acknowledgement(
                "application acknowledgement cannot be the error acknowledgement",
            ));
        }

        let consumed = branch.commit()?;
        charge_gas(ctx_b, consumed)?;
        emit_module_extras(ctx_b, extras)?;

        if recv_result.is_async() {
            if packet.payloads.len() > 1 {
                return Err(ChannelError::invalid_packet(
                    "packets with multiple payloads cannot be acknowledged asynchronously",
                ));
            }
            is_async = true;
        }

        app_acknowledgements.push(recv_result.acknowledgement);
    }

    if is_async {
        let sequence = packet.sequence;
        let async_path = AsyncPacketPath::new(&packet.destination_client, sequence);
        ctx_b.store_async_packet(&async_path, packet)?;
        ctx_b.log_message(format!(
            "packet with sequence `{sequence}` will be acknowledged asynchronously"
        ))?;
        return Ok(ResponseResultType::Success);
    }

    let acknowledgement = if recv_success {
        Acknowledgement::success(app_acknowledgements)
    } else {
        Acknowledgement::failure()
    };

    validate_acknowledgement(ctx_b, &packet, &acknowledgement)?;
    store_acknowledgement(ctx_b, packet, acknowledgement)?;

    if recv_success {
        Ok(ResponseResultType::Success)
    } else {
        Ok(ResponseResultType::Failure)
    }
}

fn is_received<Ctx>(ctx_b: &Ctx, packet: &Packet) -> Result<bool, ChannelError>
where
    Ctx: ValidationContext,
{
    Ok(ctx_b
        .get_packet_receipt(&ReceiptPath::new(&packet.destination_client, packet.sequence))?
        .is_some())
}

fn emit_recv_packet<Ctx>(ctx_b: &mut Ctx, packet: &Packet) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    let event = IbcEvent::ReceivePacket(ReceivePacket::new(packet.clone()));
    ctx_b.emit_ibc_event(IbcEvent::Message(MessageEvent::channel()))?;
    ctx_b.emit_ibc_event(event)?;
    Ok(())
}
