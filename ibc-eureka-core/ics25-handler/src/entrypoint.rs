use ibc_eureka_core_channel::handler::{
    acknowledgement_packet_execute, acknowledgement_packet_validate, recv_packet_execute,
    recv_packet_validate, send_packet_execute, send_packet_validate, timeout_packet_execute,
    timeout_packet_validate,
};
use ibc_eureka_core_channel::types::error::ChannelError;
use ibc_eureka_core_channel::types::msgs::PacketMsg;
use ibc_eureka_core_handler_types::error::HandlerError;
use ibc_eureka_core_handler_types::msgs::{MsgEnvelope, MsgResponse};
use ibc_eureka_core_host::{ExecutionContext, ValidationContext};
use ibc_eureka_core_router::module::Module;
use ibc_eureka_core_router::router::Router;
use ibc_eureka_core_router::types::error::RouterError;
use ibc_eureka_core_router::types::module::ModuleId;
use tracing::{debug, error};

/// Entrypoint which performs both validation and message execution
pub fn dispatch<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<MsgResponse, HandlerError>
where
    Ctx: ExecutionContext,
{
    validate(ctx, router, &msg)?;
    execute(ctx, router, msg)
}

/// Entrypoint which only performs message validation
///
/// If a transaction contains `n` messages `m_1` ... `m_n`, then
/// they MUST be processed as follows:
///     validate(m_1), execute(m_1), ..., validate(m_n), execute(m_n)
/// That is, the state transition of message `i` must be applied before
/// message `i+1` is validated. This is equivalent to calling
/// `dispatch()` on each successively.
pub fn validate<Ctx>(ctx: &Ctx, router: &impl Router, msg: &MsgEnvelope) -> Result<(), HandlerError>
where
    Ctx: ValidationContext,
{
    match msg {
        MsgEnvelope::Packet(msg) => {
            // the route must exist even though validation never calls into it
            route(router, msg)?;

            match msg {
                PacketMsg::Send(msg) => {
                    msg.validate_basic()?;
                    send_packet_validate(ctx, msg)
                }
                PacketMsg::Recv(msg) => {
                    msg.validate_basic()?;
                    recv_packet_validate(ctx, msg)
                }
                PacketMsg::Ack(msg) => {
                    msg.validate_basic()?;
                    acknowledgement_packet_validate(ctx, msg)
                }
                PacketMsg::Timeout(msg) => {
                    msg.validate_basic()?;
                    timeout_packet_validate(ctx, msg)
                }
            }
            .map_err(HandlerError::from)
        }
    }
}

/// Entrypoint which only performs message execution
pub fn execute<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<MsgResponse, HandlerError>
where
    Ctx: ExecutionContext,
{
    match msg {
        MsgEnvelope::Packet(msg) => {
            let module_id = route(router, &msg)?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or(RouterError::MissingModule)?;

            let result = execute_packet(ctx, module, msg);

            match &result {
                Ok(response) => debug!(
                    module = %module_id,
                    result = %response.result(),
                    "packet message executed"
                ),
                Err(e) => error!(module = %module_id, error = %e, "packet message failed"),
            }

            result.map_err(HandlerError::from)
        }
    }
}

fn execute_packet<Ctx>(
    ctx: &mut Ctx,
    module: &mut dyn Module,
    msg: PacketMsg,
) -> Result<MsgResponse, ChannelError>
where
    Ctx: ExecutionContext,
{
    let response = match msg {
        PacketMsg::Send(msg) => MsgResponse::Send {
            sequence: send_packet_execute(ctx, module, msg)?,
        },
        PacketMsg::Recv(msg) => MsgResponse::Recv(recv_packet_execute(ctx, module, msg)?),
        PacketMsg::Ack(msg) => MsgResponse::Ack(acknowledgement_packet_execute(ctx, module, msg)?),
        PacketMsg::Timeout(msg) => MsgResponse::Timeout(timeout_packet_execute(ctx, module, msg)?),
    };

    Ok(response)
}

/// Resolves the module bound to the port of the message's payload.
fn route(router: &impl Router, msg: &PacketMsg) -> Result<ModuleId, HandlerError> {
    let port_id = msg
        .port_id()
        .ok_or_else(|| ChannelError::invalid_packet("packet carries no payload"))?;

    let module_id = router
        .lookup_module(port_id)
        .ok_or_else(|| RouterError::UnknownPort {
            port_id: port_id.clone(),
        })?;

    Ok(module_id)
}
