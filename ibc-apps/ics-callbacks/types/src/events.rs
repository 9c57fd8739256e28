//! Defines the events emitted by the callbacks middleware
use ibc_eureka_core_host_types::identifiers::{ClientId, PortId, Sequence};
use ibc_eureka_core_router_types::event::ModuleEvent;
use ibc_primitives::prelude::*;

use crate::error::CallbacksError;
use crate::{CallbackData, CallbackType, MODULE_ID_STR};

pub const SOURCE_CALLBACK_EVENT: &str = "ibc_src_callback";
pub const DESTINATION_CALLBACK_EVENT: &str = "ibc_dest_callback";

pub const CALLBACK_TYPE_ATTRIBUTE_KEY: &str = "callback_type";
pub const CALLBACK_ADDRESS_ATTRIBUTE_KEY: &str = "callback_address";
pub const CALLBACK_EXEC_GAS_LIMIT_ATTRIBUTE_KEY: &str = "callback_exec_gas_limit";
pub const CALLBACK_COMMIT_GAS_LIMIT_ATTRIBUTE_KEY: &str = "callback_commit_gas_limit";
pub const CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY: &str = "packet_src_port";
pub const CALLBACK_SOURCE_CLIENT_ATTRIBUTE_KEY: &str = "packet_src_client";
pub const CALLBACK_DEST_PORT_ATTRIBUTE_KEY: &str = "packet_dest_port";
pub const CALLBACK_DEST_CLIENT_ATTRIBUTE_KEY: &str = "packet_dest_client";
pub const CALLBACK_SEQUENCE_ATTRIBUTE_KEY: &str = "packet_sequence";
pub const CALLBACK_APP_VERSION_ATTRIBUTE_KEY: &str = "callback_base_application_version";
pub const CALLBACK_RESULT_ATTRIBUTE_KEY: &str = "callback_result";
pub const CALLBACK_ERROR_ATTRIBUTE_KEY: &str = "callback_error";

pub const CALLBACK_RESULT_SUCCESS: &str = "success";
pub const CALLBACK_RESULT_FAILURE: &str = "failure";

/// Event reporting the outcome of a callback execution.
///
/// Source callbacks report the packet's source port and client, destination
/// callbacks the destination ones.
#[derive(Clone, Debug)]
pub struct CallbackEvent {
    pub callback_type: CallbackType,
    pub port_id: PortId,
    pub client_id: ClientId,
    pub sequence: Sequence,
    pub data: CallbackData,
    /// Display of the callback error, if it failed.
    pub error: Option<String>,
}

impl CallbackEvent {
    pub fn new(
        callback_type: CallbackType,
        port_id: PortId,
        client_id: ClientId,
        sequence: Sequence,
        data: CallbackData,
        result: &Result<(), CallbacksError>,
    ) -> Self {
        Self {
            callback_type,
            port_id,
            client_id,
            sequence,
            data,
            error: result.as_ref().err().map(ToString::to_string),
        }
    }
}

impl From<CallbackEvent> for ModuleEvent {
    fn from(ev: CallbackEvent) -> Self {
        let CallbackEvent {
            callback_type,
            port_id,
            client_id,
            sequence,
            data,
            error,
        } = ev;

        let (kind, port_key, client_key) = if callback_type.is_source() {
            (
                SOURCE_CALLBACK_EVENT,
                CALLBACK_SOURCE_PORT_ATTRIBUTE_KEY,
                CALLBACK_SOURCE_CLIENT_ATTRIBUTE_KEY,
            )
        } else {
            (
                DESTINATION_CALLBACK_EVENT,
                CALLBACK_DEST_PORT_ATTRIBUTE_KEY,
                CALLBACK_DEST_CLIENT_ATTRIBUTE_KEY,
            )
        };

        let mut attributes = vec![
            ("module", MODULE_ID_STR).into(),
            (CALLBACK_TYPE_ATTRIBUTE_KEY, callback_type).into(),
            (CALLBACK_ADDRESS_ATTRIBUTE_KEY, data.callback_address).into(),
            (CALLBACK_EXEC_GAS_LIMIT_ATTRIBUTE_KEY, data.execution_gas_limit).into(),
            (CALLBACK_COMMIT_GAS_LIMIT_ATTRIBUTE_KEY, data.commit_gas_limit).into(),
            (port_key, port_id).into(),
            (client_key, client_id).into(),
            (CALLBACK_SEQUENCE_ATTRIBUTE_KEY, sequence).into(),
            (CALLBACK_APP_VERSION_ATTRIBUTE_KEY, data.application_version).into(),
        ];

        match error {
            None => attributes.push((CALLBACK_RESULT_ATTRIBUTE_KEY, CALLBACK_RESULT_SUCCESS).into()),
            Some(error) => {
                attributes.push((CALLBACK_RESULT_ATTRIBUTE_KEY, CALLBACK_RESULT_FAILURE).into());
                attributes.push((CALLBACK_ERROR_ATTRIBUTE_KEY, error).into());
            }
        }

        Self {
            kind: kind.to_string(),
            attributes,
        }
    }
}
