use core::time::Duration;

use ibc_eureka_core::client::types::Height;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::primitives::Timestamp;
use typed_builder::TypedBuilder;

use crate::context::MockContext;
use crate::fixtures::packet::SENDER;
use crate::fixtures::year_2023;
use crate::relayer::context::RelayerContext;
use crate::testapp::applications::transfer::set_balance;
use crate::testapp::ibc_store::MockIbcStore;
use crate::testapp::router::MockRouter;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

pub const DEFAULT_TX_GAS_LIMIT: u64 = 10_000_000;

pub const DEFAULT_COMMITMENT_PREFIX: &[u8] = b"ibc";

/// Configuration of a [`MockContext`]; build it through
/// `MockContextConfig::builder()`.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = MockContext))]
pub struct MockContextConfig {
    #[builder(default = Height::new(0, 5).expect("Never fails"))]
    latest_height: Height,

    #[builder(default = year_2023())]
    latest_timestamp: Timestamp,

    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    block_time: Duration,

    #[builder(default = DEFAULT_TX_GAS_LIMIT)]
    tx_gas_limit: u64,

    #[builder(default = DEFAULT_COMMITMENT_PREFIX.to_vec())]
    commitment_prefix: Vec<u8>,

    #[builder(default)]
    router: MockRouter,
}

impl From<MockContextConfig> for MockContext {
    fn from(params: MockContextConfig) -> Self {
        assert_ne!(
            params.latest_height.revision_height(),
            0,
            "The chain must have a non-zero revision_height"
        );

        Self {
            ibc_store: MockIbcStore::new(
                params.latest_height,
                params.latest_timestamp,
                params.commitment_prefix,
            ),
            ibc_router: params.router,
            block_time: params.block_time,
            tx_gas_limit: params.tx_gas_limit,
        }
    }
}

/// Two default chains connected to each other, with [`SENDER`] holding
/// `initial_balance` on chain A.
pub fn dummy_relayer_context(initial_balance: u64) -> RelayerContext {
    let mut ctx_a = MockContext::default();
    set_balance(&mut ctx_a.ibc_store.app.store, SENDER, initial_balance)
        .expect("in-memory store never fails");

    RelayerContext::new(ctx_a, MockContext::default())
}
