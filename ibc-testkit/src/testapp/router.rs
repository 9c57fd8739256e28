//! A router with a single transfer application wrapped in the callbacks
//! middleware.
use ibc_app_callbacks::middleware::IbcCallbacksMiddleware;
use ibc_app_callbacks::types::CallbacksConfig;
use ibc_eureka_core::host::types::identifiers::PortId;
use ibc_eureka_core::primitives::prelude::*;
use ibc_eureka_core::router::module::Module;
use ibc_eureka_core::router::router::Router;
use ibc_eureka_core::router::types::module::ModuleId;

use crate::testapp::applications::contract::MockContractKeeper;
use crate::testapp::applications::transfer::{DummyTransferModule, TRANSFER_MODULE_ID};

/// Gas the default router lets a single callback use.
pub const DEFAULT_MAX_CALLBACK_GAS: u64 = 1_000_000;

pub type CallbacksStack = IbcCallbacksMiddleware<DummyTransferModule, MockContractKeeper>;

#[derive(Debug)]
pub struct MockRouter {
    module_id: ModuleId,
    transfer: CallbacksStack,
}

impl MockRouter {
    /// Binds the transfer port to `app` wrapped in the callbacks
    /// middleware.
    pub fn new_with_transfer(
        app: DummyTransferModule,
        contract_keeper: MockContractKeeper,
        config: CallbacksConfig,
    ) -> Self {
        Self {
            module_id: ModuleId::new(TRANSFER_MODULE_ID.to_string()),
            transfer: IbcCallbacksMiddleware::new(app, contract_keeper, config),
        }
    }

    pub fn transfer(&self) -> &CallbacksStack {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut CallbacksStack {
        &mut self.transfer
    }

    pub fn contract_keeper(&self) -> &MockContractKeeper {
        self.transfer.contract_keeper()
    }
}

impl Default for MockRouter {
    fn default() -> Self {
        let config = CallbacksConfig::new(DEFAULT_MAX_CALLBACK_GAS).expect("non-zero max gas");
        Self::new_with_transfer(
            DummyTransferModule::new(),
            MockContractKeeper::new(),
            config,
        )
    }
}

impl Router for MockRouter {
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module> {
        if *module_id != self.module_id {
            return None;
        }
        let module: &dyn Module = &self.transfer;
        Some(module)
    }

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        if *module_id != self.module_id {
            return None;
        }
        let module: &mut dyn Module = &mut self.transfer;
        Some(module)
    }

    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId> {
        (*port_id == PortId::transfer()).then(|| self.module_id.clone())
    }
}
