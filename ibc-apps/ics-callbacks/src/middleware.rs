//! The callbacks middleware wrapping an application module.
use ibc_app_callbacks_types::error::CallbacksError;
use ibc_app_callbacks_types::events::CallbackEvent;
use ibc_app_callbacks_types::{CallbackData, CallbackType, CallbacksConfig};
use ibc_eureka_core::channel::handler::write_acknowledgement as write_acknowledgement_core;
use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::packet::Payload;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::host::app::AppContext;
use ibc_eureka_core::host::types::identifiers::{ClientId, PortId, Sequence};
use ibc_eureka_core::host::types::path::AsyncPacketPath;
use ibc_eureka_core::host::ExecutionContext;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Signer;
use ibc_eureka_core::router::module::{Module, PacketDataProvider, PacketDataUnmarshaler};
use ibc_eureka_core::router::types::error::ModuleError;
use ibc_eureka_core::router::types::module::{ModuleExtras, PacketStatus, RecvPacketResult};
use tracing::warn;

use crate::context::{CallbackPacket, ContractKeeper};
use crate::process::process_callback;

/// Wraps an application so that packets whose memo opts in trigger contract
/// callbacks.
///
/// The wrapped application always runs first. Send callbacks can reject the
/// send and receive callbacks can fail the receive; acknowledgement and
/// timeout callbacks never block the packet and only report their outcome in
/// the callback event. Memos with malformed callback metadata are treated as
/// not opting in.
#[derive(Debug)]
pub struct IbcCallbacksMiddleware<M, K> {
    app: M,
    contract_keeper: K,
    config: CallbacksConfig,
}

/// What a contract callback is handed besides the packet.
enum CallbackInput<'a> {
    Send,
    Receive { acknowledgement: &'a [u8] },
    Acknowledgement {
        acknowledgement: &'a [u8],
        relayer: &'a Signer,
    },
    Timeout { relayer: &'a Signer },
}

impl CallbackInput<'_> {
    fn callback_type(&self) -> CallbackType {
        match self {
            Self::Send => CallbackType::SendPacket,
            Self::Receive { .. } => CallbackType::ReceivePacket,
            Self::Acknowledgement { .. } => CallbackType::AcknowledgementPacket,
            Self::Timeout { .. } => CallbackType::TimeoutPacket,
        }
    }
}

impl<M, K> IbcCallbacksMiddleware<M, K>
where
    M: Module + PacketDataUnmarshaler,
    K: ContractKeeper,
{
    pub fn new(app: M, contract_keeper: K, config: CallbacksConfig) -> Self {
        Self {
            app,
            contract_keeper,
            config,
        }
    }

    pub fn app(&self) -> &M {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut M {
        &mut self.app
    }

    pub fn contract_keeper(&self) -> &K {
        &self.contract_keeper
    }

    pub fn contract_keeper_mut(&mut self) -> &mut K {
        &mut self.contract_keeper
    }

    pub fn config(&self) -> &CallbacksConfig {
        &self.config
    }

    /// Writes the acknowledgement of a packet the wrapped application
    /// acknowledged asynchronously, then runs the receive callback the
    /// packet asked for.
    ///
    /// Callback failures are only reported in the callback event, except
    /// for aborts.
    pub fn write_acknowledgement<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        client_id: &ClientId,
        sequence: Sequence,
        acknowledgement: Acknowledgement,
    ) -> Result<(), ChannelError>
    where
        Ctx: ExecutionContext,
    {
        let packet = ctx
            .get_async_packet(&AsyncPacketPath::new(client_id, sequence))?
            .ok_or_else(|| ChannelError::AsyncPacketNotFound {
                client_id: client_id.clone(),
                sequence,
            })?;

        let [payload] = packet.payloads.as_slice() else {
            return Err(ChannelError::invalid_acknowledgement(
                "async packet must carry exactly one payload",
            ));
        };

        // the application accepted this payload on receive
        self.app.unmarshal_packet_data(payload)?;

        let app_acknowledgement = acknowledgement.app_acknowledgement(0).unwrap_or_default();

        write_acknowledgement_core(ctx, client_id, sequence, acknowledgement)?;

        let callback_packet = CallbackPacket {
            source_client: &packet.source_client,
            destination_client: &packet.destination_client,
            sequence,
            payload,
        };

        let event = self.run_callback(
            ctx.app_context_mut(),
            &callback_packet,
            CallbackInput::Receive {
                acknowledgement: &app_acknowledgement,
            },
        )?;

        if let Some((event, _)) = event {
            ctx.emit_ibc_event(IbcEvent::Module(event.into()))?;
        }

        Ok(())
    }

    /// Resolves the callback `callback_type` requests for `payload`.
    ///
    /// Payloads the application cannot decode, and memos that do not opt in,
    /// yield `Ok(None)`. Undecodable payloads are rejected by the application
    /// itself before any callback is resolved.
    fn callback_data(
        &self,
        ctx: &dyn AppContext,
        callback_type: CallbackType,
        payload: &Payload,
    ) -> Result<Option<CallbackData>, CallbacksError> {
        let Ok(packet_data) = self.app.unmarshal_packet_data(payload) else {
            return Ok(None);
        };
        let Some(memo) = packet_data.memo() else {
            return Ok(None);
        };

        CallbackData::from_memo(
            memo,
            callback_type,
            packet_data.packet_sender(&payload.source_port),
            &payload.version,
            ctx.gas_meter().remaining(),
            self.config.max_callback_gas(),
        )
    }

    /// Resolves and runs the callback of `input` for `packet`.
    ///
    /// Returns `Ok(None)` when the packet did not opt in or its callback
    /// metadata is malformed. Otherwise the callback event is returned
    /// together with the callback outcome; aborts are returned as errors
    /// right away.
    fn run_callback(
        &mut self,
        ctx: &mut dyn AppContext,
        packet: &CallbackPacket<'_>,
        input: CallbackInput<'_>,
    ) -> Result<Option<(CallbackEvent, Result<(), CallbacksError>)>, ModuleError> {
        let callback_type = input.callback_type();

        let callback_data = match self.callback_data(&*ctx, callback_type, packet.payload) {
            Ok(Some(callback_data)) => callback_data,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(%callback_type, sequence = %packet.sequence, error = %e, "skipping callback with malformed metadata");
                return Ok(None);
            }
        };

        let keeper = &mut self.contract_keeper;
        let outcome = process_callback(ctx, callback_type, &callback_data, |ctx| match input {
            CallbackInput::Send => keeper.ibc_send_packet_callback(ctx, packet, &callback_data),
            CallbackInput::Receive { acknowledgement } => {
                keeper.ibc_receive_packet_callback(ctx, packet, acknowledgement, &callback_data)
            }
            CallbackInput::Acknowledgement {
                acknowledgement,
                relayer,
            } => keeper.ibc_on_acknowledgement_packet_callback(
                ctx,
                packet,
                acknowledgement,
                relayer,
                &callback_data,
            ),
            CallbackInput::Timeout { relayer } => {
                keeper.ibc_on_timeout_packet_callback(ctx, packet, relayer, &callback_data)
            }
        });

        if let Err(CallbacksError::Abort(signal)) = outcome {
            return Err(ModuleError::Abort(signal));
        }

        let (port_id, client_id) = event_location(packet, callback_type);
        let event = CallbackEvent::new(
            callback_type,
            port_id,
            client_id,
            packet.sequence,
            callback_data,
            &outcome,
        );

        Ok(Some((event, outcome)))
    }
}

/// Source callbacks are reported against the source port and client,
/// destination callbacks against the destination ones.
fn event_location(packet: &CallbackPacket<'_>, callback_type: CallbackType) -> (PortId, ClientId) {
    if callback_type.is_source() {
        (
            packet.payload.source_port.clone(),
            packet.source_client.clone(),
        )
    } else {
        (
            packet.payload.destination_port.clone(),
            packet.destination_client.clone(),
        )
    }
}

impl<M, K> Module for IbcCallbacksMiddleware<M, K>
where
    M: Module + PacketDataUnmarshaler,
    K: ContractKeeper,
{
    fn on_send_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        signer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        let mut extras = self.app.on_send_packet(
            ctx,
            source_client,
            destination_client,
            sequence,
            payload,
            signer,
        )?;

        let packet = CallbackPacket {
            source_client,
            destination_client,
            sequence,
            payload,
        };

        if let Some((event, outcome)) = self.run_callback(ctx, &packet, CallbackInput::Send)? {
            // the contract may reject the send
            outcome?;
            extras.events.push(event.into());
        }

        Ok(extras)
    }

    fn on_recv_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<(ModuleExtras, RecvPacketResult), ModuleError> {
        let (mut extras, result) = self.app.on_recv_packet(
            ctx,
            source_client,
            destination_client,
            sequence,
            payload,
            relayer,
        )?;

        // async receives run their callback once the acknowledgement is
        // written; failed ones have nothing to call back about
        if result.status != PacketStatus::Success {
            return Ok((extras, result));
        }

        let packet = CallbackPacket {
            source_client,
            destination_client,
            sequence,
            payload,
        };

        let input = CallbackInput::Receive {
            acknowledgement: &result.acknowledgement,
        };
        match self.run_callback(ctx, &packet, input)? {
            Some((event, outcome)) => {
                extras.events.push(event.into());
                if outcome.is_err() {
                    return Ok((extras, RecvPacketResult::failure()));
                }
                Ok((extras, result))
            }
            None => Ok((extras, result)),
        }
    }

    fn on_acknowledgement_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        acknowledgement: &[u8],
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        let mut extras = self.app.on_acknowledgement_packet(
            ctx,
            source_client,
            destination_client,
            sequence,
            acknowledgement,
            payload,
            relayer,
        )?;

        let packet = CallbackPacket {
            source_client,
            destination_client,
            sequence,
            payload,
        };

        let input = CallbackInput::Acknowledgement {
            acknowledgement,
            relayer,
        };
        if let Some((event, _)) = self.run_callback(ctx, &packet, input)? {
            extras.events.push(event.into());
        }

        Ok(extras)
    }

    fn on_timeout_packet(
        &mut self,
        ctx: &mut dyn AppContext,
        source_client: &ClientId,
        destination_client: &ClientId,
        sequence: Sequence,
        payload: &Payload,
        relayer: &Signer,
    ) -> Result<ModuleExtras, ModuleError> {
        let mut extras = self.app.on_timeout_packet(
            ctx,
            source_client,
            destination_client,
            sequence,
            payload,
            relayer,
        )?;

        let packet = CallbackPacket {
            source_client,
            destination_client,
            sequence,
            payload,
        };

        if let Some((event, _)) =
            self.run_callback(ctx, &packet, CallbackInput::Timeout { relayer })?
        {
            extras.events.push(event.into());
        }

        Ok(extras)
    }
}

/// Stacked middlewares decode payloads through the wrapped application.
impl<M, K> PacketDataUnmarshaler for IbcCallbacksMiddleware<M, K>
where
    M: PacketDataUnmarshaler,
{
    type PacketData = M::PacketData;

    fn unmarshal_packet_data(&self, payload: &Payload) -> Result<Self::PacketData, ModuleError> {
        self.app.unmarshal_packet_data(payload)
    }
}
