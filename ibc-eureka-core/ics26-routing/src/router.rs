//! Defines the `Router`, which binds modules to ports
use alloc::collections::BTreeMap;

use ibc_eureka_core_host_types::identifiers::PortId;
use ibc_eureka_core_router_types::error::RouterError;
use ibc_eureka_core_router_types::module::ModuleId;
use ibc_primitives::prelude::*;

use crate::module::Module;

/// Router as defined in ICS-26, which binds modules to ports.
pub trait Router {
    /// Returns a reference to a `Module` registered against the specified `ModuleId`
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module>;

    /// Returns a mutable reference to a `Module` registered against the specified `ModuleId`
    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module>;

    /// Return the module_id associated with a given port_id
    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId>;
}

/// A registry of modules and the ports they own.
///
/// Registration fails on a duplicate module id, on a port that is already
/// bound and on a port bound to a module that is not registered.
#[derive(Debug, Default)]
pub struct ModuleRouter {
    modules: BTreeMap<ModuleId, Box<dyn Module>>,
    port_to_module: BTreeMap<PortId, ModuleId>,
}

impl ModuleRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(
        &mut self,
        module_id: ModuleId,
        module: impl Module + 'static,
    ) -> Result<(), RouterError> {
        if self.modules.contains_key(&module_id) {
            return Err(RouterError::DuplicateModule { module_id });
        }
        self.modules.insert(module_id, Box::new(module));
        Ok(())
    }

    pub fn bind_port(&mut self, port_id: PortId, module_id: ModuleId) -> Result<(), RouterError> {
        if !self.modules.contains_key(&module_id) {
            return Err(RouterError::MissingModule);
        }
        if let Some(owner) = self.port_to_module.get(&port_id) {
            return Err(RouterError::DuplicatePort {
                port_id,
                module_id: owner.clone(),
            });
        }
        self.port_to_module.insert(port_id, module_id);
        Ok(())
    }

    /// Registers `module` and binds `port_id` to it in one step.
    pub fn add_module(
        &mut self,
        module_id: ModuleId,
        port_id: PortId,
        module: impl Module + 'static,
    ) -> Result<(), RouterError> {
        if let Some(owner) = self.port_to_module.get(&port_id) {
            return Err(RouterError::DuplicatePort {
                port_id,
                module_id: owner.clone(),
            });
        }
        self.add_route(module_id.clone(), module)?;
        self.bind_port(port_id, module_id)
    }

    pub fn has_route(&self, module_id: &ModuleId) -> bool {
        self.modules.contains_key(module_id)
    }
}

impl Router for ModuleRouter {
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module> {
        self.modules.get(module_id).map(AsRef::as_ref)
    }

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        match self.modules.get_mut(module_id) {
            Some(module) => Some(module.as_mut()),
            None => None,
        }
    }

    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId> {
        self.port_to_module.get(port_id).cloned()
    }
}
