//! Runs a callback on an isolated, gas-limited branch of the application
//! state.
use ibc_app_callbacks_types::error::CallbacksError;
use ibc_app_callbacks_types::{CallbackData, CallbackType};
use ibc_eureka_core::host::app::{AppContext, BranchContext};
use ibc_eureka_core::host::gas::GasError;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::router::types::error::AbortSignal;
use tracing::{debug, error, warn};

use crate::context::ContractError;

/// Executes `executor` on a branch of `ctx` limited to
/// `callback_data.execution_gas_limit`.
///
/// The branch is merged only when the executor returns `Ok` without
/// exhausting its gas. `ctx` is charged the gas the branch consumed, capped
/// at the execution limit. Failures are resolved in this order:
///
/// 1. Out of gas: aborts the transaction with the commit gas limit as the
///    required gas if the relayer could retry with more gas, otherwise
///    [`CallbacksError::CallbackOutOfGas`].
/// 2. Panic: aborts the transaction for send callbacks, otherwise
///    [`CallbacksError::CallbackPanic`].
/// 3. Any other error is returned as [`CallbacksError::Contract`].
pub fn process_callback<F>(
    ctx: &mut dyn AppContext,
    callback_type: CallbackType,
    callback_data: &CallbackData,
    executor: F,
) -> Result<(), CallbacksError>
where
    F: FnOnce(&mut dyn AppContext) -> Result<(), ContractError>,
{
    let execution_gas_limit = callback_data.execution_gas_limit;

    let mut branch = BranchContext::new(ctx, execution_gas_limit);
    let result = executor(&mut branch);

    let out_of_gas = branch.gas_meter().is_out_of_gas()
        || matches!(result, Err(ContractError::OutOfGas(_)));

    let consumed = if result.is_ok() && !out_of_gas {
        branch.commit()?
    } else {
        branch.discard()
    };

    ctx.gas_meter_mut()
        .consume(consumed.min(execution_gas_limit))
        .map_err(|GasError::OutOfGas { consumed, .. }| AbortSignal::OutOfGas {
            required_gas: consumed,
        })?;

    if out_of_gas {
        if callback_data.allow_retry() {
            error!(
                %callback_type,
                address = %callback_data.callback_address,
                execution_gas_limit,
                commit_gas_limit = callback_data.commit_gas_limit,
                "callback ran out of gas; aborting so it can be retried"
            );
            return Err(AbortSignal::OutOfGas {
                required_gas: callback_data.commit_gas_limit,
            }
            .into());
        }

        warn!(%callback_type, address = %callback_data.callback_address, "callback ran out of gas");
        return Err(CallbacksError::CallbackOutOfGas {
            callback_type,
            execution_gas_limit,
        });
    }

    match result {
        Ok(()) => {
            debug!(%callback_type, address = %callback_data.callback_address, consumed, "callback executed");
            Ok(())
        }
        Err(ContractError::Panic { description }) if callback_type == CallbackType::SendPacket => {
            error!(%callback_type, %description, "callback panicked; aborting");
            Err(AbortSignal::Panic { description }.into())
        }
        Err(ContractError::Panic { description }) => {
            warn!(%callback_type, %description, "callback panicked");
            Err(CallbacksError::CallbackPanic {
                callback_type,
                description,
            })
        }
        Err(e) => {
            warn!(%callback_type, error = %e, "callback failed");
            Err(CallbacksError::Contract {
                callback_type,
                description: e.to_string(),
            })
        }
    }
}
