use core::time::Duration;

use ibc_eureka_core::channel::types::acknowledgement::Acknowledgement;
use ibc_eureka_core::channel::types::error::ChannelError;
use ibc_eureka_core::channel::types::Counterparty;
use ibc_eureka_core::client::types::Height;
use ibc_eureka_core::commitment_types::merkle::MerklePrefix;
use ibc_eureka_core::entrypoint::dispatch;
use ibc_eureka_core::handler::types::events::IbcEvent;
use ibc_eureka_core::handler::types::msgs::{MsgEnvelope, MsgResponse};
use ibc_eureka_core::host::gas::GasMeter;
use ibc_eureka_core::host::types::identifiers::{ClientId, Sequence};
use ibc_eureka_core::host::types::path::CounterpartyPath;
use ibc_eureka_core::host::ExecutionContext;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Timestamp;
use ibc_eureka_core::router::types::event::ModuleEvent;
use tracing::warn;

use crate::fixtures::context::MockContextConfig;
use crate::relayer::error::RelayerError;
use crate::testapp::clients::mock::MockConsensusState;
use crate::testapp::ibc_store::MockIbcStore;
use crate::testapp::router::MockRouter;

/// A host chain that delivers IBC messages to a transfer application
/// wrapped in the callbacks middleware.
///
/// Every delivered message runs as its own transaction: on failure all of
/// its writes and events are rolled back, on success a new block is
/// produced.
#[derive(Debug)]
pub struct MockContext {
    /// An object that stores all IBC related data.
    pub ibc_store: MockIbcStore,

    /// A router that can route messages to the appropriate IBC application.
    pub ibc_router: MockRouter,

    pub block_time: Duration,

    /// Gas each delivered message may consume.
    pub tx_gas_limit: u64,
}

/// Returns a MockContext at height 5 with no clients and the default
/// transfer router.
impl Default for MockContext {
    fn default() -> Self {
        MockContextConfig::builder().build()
    }
}

impl MockContext {
    pub fn ibc_store(&self) -> &MockIbcStore {
        &self.ibc_store
    }

    pub fn ibc_store_mut(&mut self) -> &mut MockIbcStore {
        &mut self.ibc_store
    }

    pub fn latest_height(&self) -> Height {
        self.ibc_store.host_height
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.ibc_store.host_timestamp
    }

    /// Produces a block `block_time` after the latest one.
    pub fn advance_block(&mut self) {
        self.advance_time(self.block_time);
    }

    /// Produces a block `duration` after the latest one.
    pub fn advance_time(&mut self, duration: Duration) {
        let height = self.latest_height().increment();
        let timestamp = (self.latest_timestamp() + duration).expect("no overflow");
        self.ibc_store.set_host_block(height, timestamp);
    }

    /// Creates `client_id` and binds it to `counterparty_client_id`, whose
    /// packet state is proven under `counterparty_prefix`.
    pub fn with_counterparty(
        mut self,
        client_id: &ClientId,
        counterparty_client_id: ClientId,
        counterparty_prefix: Vec<u8>,
    ) -> Self {
        self.ibc_store.clients.create_client(client_id.clone());
        self.ibc_store
            .store_counterparty(
                &CounterpartyPath::new(client_id),
                Counterparty::new(
                    counterparty_client_id,
                    MerklePrefix::new(vec![counterparty_prefix]),
                ),
            )
            .expect("in-memory store never fails");
        self
    }

    /// What a light client of this chain learns at the latest height.
    pub fn consensus_state(&self) -> MockConsensusState {
        MockConsensusState::new(self.latest_timestamp(), self.ibc_store.provable_state())
    }

    /// A datagram passes from the relayer to the IBC module (on host chain).
    pub fn deliver(&mut self, msg: MsgEnvelope) -> Result<MsgResponse, RelayerError> {
        self.ibc_store.app.gas_meter = GasMeter::new(self.tx_gas_limit);
        let snapshot = self.ibc_store.clone();

        match dispatch(&mut self.ibc_store, &mut self.ibc_router, msg) {
            Ok(response) => {
                self.advance_block();
                Ok(response)
            }
            Err(e) => {
                if let Some(signal) = e.abort_signal() {
                    warn!(%signal, "transaction aborted");
                }
                self.ibc_store = snapshot;
                Err(RelayerError::TransactionFailed(e))
            }
        }
    }

    /// Has the transfer application acknowledge a packet it received
    /// asynchronously, as a transaction of its own.
    pub fn write_acknowledgement(
        &mut self,
        client_id: &ClientId,
        sequence: Sequence,
        acknowledgement: Acknowledgement,
    ) -> Result<(), ChannelError> {
        self.ibc_store.app.gas_meter = GasMeter::new(self.tx_gas_limit);
        let snapshot = self.ibc_store.clone();

        let result = self.ibc_router.transfer_mut().write_acknowledgement(
            &mut self.ibc_store,
            client_id,
            sequence,
            acknowledgement,
        );

        match result {
            Ok(()) => self.advance_block(),
            Err(_) => self.ibc_store = snapshot,
        }
        result
    }

    pub fn get_events(&self) -> Vec<IbcEvent> {
        self.ibc_store.events.clone()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.ibc_store.logs.clone()
    }

    /// Module events of the given kind, in emission order.
    pub fn module_events(&self, kind: &str) -> Vec<ModuleEvent> {
        self.ibc_store
            .events
            .iter()
            .filter_map(|event| match event {
                IbcEvent::Module(event) if event.kind == kind => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Gas consumed by the last delivered message.
    pub fn gas_consumed(&self) -> u64 {
        self.ibc_store.app.gas_meter.consumed()
    }
}
