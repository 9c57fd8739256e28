//! This module implements the processing logic for IBC Eureka packet messages.
use ibc_eureka_core_channel_types::commitment::compute_packet_commitment;
use ibc_eureka_core_channel_types::error::ChannelError;
use ibc_eureka_core_channel_types::packet::Packet;
use ibc_eureka_core_channel_types::Counterparty;
use ibc_eureka_core_client::context::ClientValidationContext;
use ibc_eureka_core_handler_types::events::IbcEvent;
use ibc_eureka_core_host::gas::GasError;
use ibc_eureka_core_host::types::identifiers::ClientId;
use ibc_eureka_core_host::types::path::{CommitmentPath, CounterpartyPath};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::types::error::{AbortSignal, ModuleError};
use ibc_eureka_core_router::types::module::ModuleExtras;
use ibc_primitives::prelude::*;

mod acknowledgement;
mod recv_packet;
mod send_packet;
mod timeout;
mod write_acknowledgement;

pub use acknowledgement::*;
pub use recv_packet::*;
pub use send_packet::*;
pub use timeout::*;
pub use write_acknowledgement::*;

/// Kind prefix given to the events of an application callback whose state
/// changes were discarded.
pub const ERROR_EVENT_PREFIX: &str = "ibccallbackerror-";

pub(crate) fn counterparty_of<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<Counterparty, ChannelError>
where
    Ctx: ValidationContext,
{
    ctx.counterparty(&CounterpartyPath::new(client_id))?
        .ok_or_else(|| ChannelError::CounterpartyNotFound(client_id.clone()))
}

/// Resolves the counterparty of the packet's source client and checks that
/// it is the packet's destination.
pub(crate) fn source_counterparty<Ctx>(ctx: &Ctx, packet: &Packet) -> Result<Counterparty, ChannelError>
where
    Ctx: ValidationContext,
{
    let counterparty = counterparty_of(ctx, &packet.source_client)?;
    if counterparty.client_id != packet.destination_client {
        return Err(ChannelError::InvalidChannelIdentifier {
            expected: counterparty.client_id,
            actual: packet.destination_client.clone(),
        });
    }
    Ok(counterparty)
}

/// Returns `false` if the send commitment of `packet` is gone, meaning the
/// packet was already acknowledged or timed out.
pub(crate) fn has_matching_commitment<Ctx>(ctx: &Ctx, packet: &Packet) -> Result<bool, ChannelError>
where
    Ctx: ValidationContext,
{
    let commitment_path = CommitmentPath::new(&packet.source_client, packet.sequence);
    let Some(stored) = ctx.get_packet_commitment(&commitment_path)? else {
        return Ok(false);
    };

    let computed = compute_packet_commitment(packet);
    if stored != computed {
        return Err(ChannelError::invalid_packet(format!(
            "commitment bytes are not equal: got ({computed:?}), expected ({stored:?})"
        )));
    }

    Ok(true)
}

pub(crate) fn verify_client_active<Ctx>(ctx: &Ctx, client_id: &ClientId) -> Result<(), ChannelError>
where
    Ctx: ValidationContext,
{
    let status = ctx
        .get_client_validation_context()
        .client_status(client_id)?;

    if !status.is_active() {
        return Err(ChannelError::ClientNotActive {
            client_id: client_id.clone(),
            status,
        });
    }

    Ok(())
}

/// Charges gas consumed on an application branch to the transaction.
pub(crate) fn charge_gas<Ctx>(ctx: &mut Ctx, amount: u64) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    ctx.app_context_mut()
        .gas_meter_mut()
        .consume(amount)
        .map_err(|GasError::OutOfGas { consumed, .. }| {
            ModuleError::from(AbortSignal::OutOfGas {
                required_gas: consumed,
            })
            .into()
        })
}

pub(crate) fn emit_module_extras<Ctx>(ctx: &mut Ctx, extras: ModuleExtras) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    for module_event in extras.events {
        ctx.emit_ibc_event(IbcEvent::Module(module_event))?;
    }

    for log_message in extras.log {
        ctx.log_message(log_message)?;
    }

    Ok(())
}

/// Emits the extras of a discarded callback with their event kinds marked
/// as errors.
pub(crate) fn emit_error_extras<Ctx>(ctx: &mut Ctx, mut extras: ModuleExtras) -> Result<(), ChannelError>
where
    Ctx: ExecutionContext,
{
    for event in extras.events.iter_mut() {
        event.kind = format!("{ERROR_EVENT_PREFIX}{}", event.kind);
    }
    emit_module_extras(ctx, extras)
}
