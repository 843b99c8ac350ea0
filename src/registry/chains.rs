//! Chain lookup by name or chain id

use super::{ChainDescriptor, ChainRegistry};
use crate::error::{OrchestratorError, OrchestratorResult};

use tracing::debug;

/// Read-only chain lookups over a merged registry
#[derive(Clone, Copy)]
pub struct ChainLocator<'a> {
    registry: &'a ChainRegistry,
}

impl<'a> ChainLocator<'a> {
    pub fn new(registry: &'a ChainRegistry) -> Self {
        Self { registry }
    }

    /// Find a chain by its registry name
    pub fn by_name(&self, chain_name: &str) -> OrchestratorResult<&'a ChainDescriptor> {
        self.find_by_name(chain_name)
            .ok_or_else(|| OrchestratorError::ChainNotFound(chain_name.to_string()))
    }

    /// Find a chain by its chain id (e.g. `osmosis-1`)
    pub fn by_id(&self, chain_id: &str) -> OrchestratorResult<&'a ChainDescriptor> {
        self.registry
            .chains()
            .iter()
            .find(|c| c.chain_id == chain_id)
            .ok_or_else(|| OrchestratorError::ChainNotFound(chain_id.to_string()))
    }

    /// Map a chain id back to its chain name
    pub fn name_for_id(&self, chain_id: &str) -> OrchestratorResult<&'a str> {
        let chain = self.by_id(chain_id)?;
        debug!("Chain id {} resolved to {}", chain_id, chain.chain_name);
        Ok(&chain.chain_name)
    }

    /// Lookup that treats a missing chain as a normal outcome
    pub fn find_by_name(&self, chain_name: &str) -> Option<&'a ChainDescriptor> {
        self.registry
            .chains()
            .iter()
            .find(|c| c.chain_name == chain_name)
    }

    /// First configured RPC endpoint of a chain
    pub fn primary_rpc(chain: &ChainDescriptor) -> OrchestratorResult<&str> {
        chain
            .rpc_endpoints
            .first()
            .map(String::as_str)
            .ok_or_else(|| OrchestratorError::NoRpcEndpoint {
                chain_name: chain.chain_name.clone(),
            })
    }
}
