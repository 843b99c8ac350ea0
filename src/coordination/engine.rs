//! Cross-chain transfer and swap orchestration over an external route engine

use super::ambiguity;
use super::stage::{BridgeStage, StageTracker};
use crate::chain::WalletProvider;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::intent::{
    BridgeTransferRequest, RouteStatus, SwapRequest, SwapResult, TransferResult,
};
use crate::registry::{units, AssetDescriptor, ChainDescriptor, ChainRegistry};
use crate::route::{
    completion_channel, ChainAddress, DenomMapper, RouteEngine, RoutePlan, RouteRequest,
    RouteState, DEFAULT_AFFILIATE_FEE_BPS,
};

use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// A fully resolved route leg, ready for routing
struct Leg<'a> {
    source_chain: &'a ChainDescriptor,
    dest_chain: &'a ChainDescriptor,
    source_denom: String,
    dest_denom: String,
    amount_in: u128,
    sender: String,
    /// Reported recipient on the destination chain
    receiver: String,
}

/// What came back from route execution
struct Execution {
    plan: RoutePlan,
    tx_hash: Option<String>,
    status: RouteStatus,
    failure: Option<String>,
}

/// Drives IBC transfers and swaps through an external route engine
pub struct IbcOrchestrator {
    /// Merged chain registry
    registry: Arc<ChainRegistry>,
    /// Wallet for per-chain addresses
    wallet: Arc<dyn WalletProvider>,
    /// Route computation and execution
    route_engine: Arc<dyn RouteEngine>,
    /// Destination denom lookup for transfers
    denom_mapper: Arc<dyn DenomMapper>,
}

impl IbcOrchestrator {
    pub fn new(
        registry: Arc<ChainRegistry>,
        wallet: Arc<dyn WalletProvider>,
        route_engine: Arc<dyn RouteEngine>,
        denom_mapper: Arc<dyn DenomMapper>,
    ) -> Self {
        Self {
            registry,
            wallet,
            route_engine,
            denom_mapper,
        }
    }

    /// Move a token to an address on another chain.
    ///
    /// Errors before execution (validation, lookups, denom mapping, route
    /// computation) are returned as `Err`. Once execution starts the result
    /// is always a `SwapResult`, with `status` telling success from failure.
    pub async fn transfer(&self, request: &BridgeTransferRequest) -> OrchestratorResult<SwapResult> {
        let span = info_span!("ibc_transfer", execution_id = %Uuid::new_v4());
        self.run_transfer(request)
            .instrument(span)
            .await
            .map_err(|e| ambiguity::translate(e, &self.registry))
    }

    /// Swap a token into another asset held by the wallet on the target chain
    pub async fn swap(&self, request: &SwapRequest) -> OrchestratorResult<SwapResult> {
        let span = info_span!("ibc_swap", execution_id = %Uuid::new_v4());
        self.run_swap(request)
            .instrument(span)
            .await
            .map_err(|e| ambiguity::translate(e, &self.registry))
    }

    async fn run_transfer(&self, request: &BridgeTransferRequest) -> OrchestratorResult<SwapResult> {
        let mut stages = StageTracker::new();
        let request = request.validate()?;
        stages.advance(BridgeStage::Resolving)?;

        let locator = self.registry.locator();
        let source_chain = locator.by_name(&request.chain_name)?;
        let dest_chain = locator.by_name(&request.target_chain_name)?;
        let sender = self.wallet_address(&source_chain.chain_name).await?;

        let source_asset = self.source_asset(
            &request.symbol,
            request.source_denom.as_deref(),
            &source_chain.chain_name,
        )?;
        let amount_in = units::to_base_units(&request.amount, source_asset.exponent)?;

        let dest_denom = match request.destination_denom {
            Some(denom) => denom,
            None => {
                self.denom_mapper
                    .map_denom(&source_asset.base, &source_chain.chain_id, &dest_chain.chain_id)
                    .await?
            }
        };
        debug!(
            "Mapped {} on {} to {} on {}",
            source_asset.base, source_chain.chain_id, dest_denom, dest_chain.chain_id
        );

        let leg = Leg {
            source_chain,
            dest_chain,
            source_denom: source_asset.base.clone(),
            dest_denom,
            amount_in,
            sender,
            receiver: request.to_address,
        };
        let execution = self.route_and_execute(&mut stages, &leg, "transfer").await?;

        Ok(self.finish(
            &leg,
            execution,
            request.symbol.clone(),
            request.amount,
            request.symbol,
            request.target_chain_name,
        ))
    }

    async fn run_swap(&self, request: &SwapRequest) -> OrchestratorResult<SwapResult> {
        let mut stages = StageTracker::new();
        let request = request.validate()?;
        stages.advance(BridgeStage::Resolving)?;

        let locator = self.registry.locator();
        let source_chain = locator.by_name(&request.from_chain_name)?;
        let dest_chain = locator.by_name(&request.to_chain_name)?;
        let sender = self.wallet_address(&source_chain.chain_name).await?;
        let receiver = self.wallet_address(&dest_chain.chain_name).await?;

        let source_asset = self.source_asset(
            &request.from_symbol,
            request.from_denom.as_deref(),
            &source_chain.chain_name,
        )?;
        let amount_in = units::to_base_units(&request.from_amount, source_asset.exponent)?;

        let dest_denom = match request.to_denom {
            Some(denom) => denom,
            None => self
                .registry
                .resolver()
                .resolve(&request.to_symbol, &dest_chain.chain_name)?
                .base
                .clone(),
        };

        let leg = Leg {
            source_chain,
            dest_chain,
            source_denom: source_asset.base.clone(),
            dest_denom,
            amount_in,
            sender,
            receiver,
        };
        let execution = self.route_and_execute(&mut stages, &leg, "swap").await?;

        Ok(self.finish(
            &leg,
            execution,
            request.from_symbol,
            request.from_amount,
            request.to_symbol,
            request.to_chain_name,
        ))
    }

    /// Routing, addressing and execution shared by transfers and swaps
    async fn route_and_execute(
        &self,
        stages: &mut StageTracker,
        leg: &Leg<'_>,
        kind: &'static str,
    ) -> OrchestratorResult<Execution> {
        stages.advance(BridgeStage::Routing)?;
        let plan = self
            .route_engine
            .route(RouteRequest {
                source_chain_id: leg.source_chain.chain_id.clone(),
                source_denom: leg.source_denom.clone(),
                dest_chain_id: leg.dest_chain.chain_id.clone(),
                dest_denom: leg.dest_denom.clone(),
                amount_in: leg.amount_in.to_string(),
                affiliate_fee_bps: DEFAULT_AFFILIATE_FEE_BPS,
            })
            .await?;

        if let Some(out) = &plan.estimated_amount_out {
            info!(
                "Route estimate: {} {} -> {} {} (fees {}, ~{}s)",
                leg.amount_in,
                leg.source_denom,
                out,
                leg.dest_denom,
                plan.estimated_fees.as_deref().unwrap_or("unknown"),
                plan.estimated_duration_secs.unwrap_or_default()
            );
        }

        stages.advance(BridgeStage::Addressing)?;
        let addresses = self.route_addresses(&plan).await?;

        stages.advance(BridgeStage::Executing)?;
        let (handle, slot) = completion_channel();
        let started = Instant::now();
        let outcome = self
            .route_engine
            .execute_route(&plan, &addresses, handle)
            .await;
        crate::metrics::observe_route_latency(kind, started.elapsed().as_secs_f64());

        let tx_hash = slot
            .take()
            .map(|completion| completion.tx_hash)
            .filter(|hash| !hash.is_empty());

        let (status, failure) = match outcome {
            Ok(state) if state.is_success() && tx_hash.is_some() => (RouteStatus::Success, None),
            Ok(RouteState::CompletedSuccess) => (
                RouteStatus::Failure,
                Some("Route reported success without a transaction hash".to_string()),
            ),
            Ok(state) => (
                RouteStatus::Failure,
                Some(format!("Route ended in state {:?}", state)),
            ),
            Err(e) => match ambiguity::translate(e, &self.registry) {
                e @ OrchestratorError::AmbiguousAsset { .. } => {
                    warn!(
                        "Route execution stopped on ambiguous asset (captured hash: {})",
                        tx_hash.as_deref().unwrap_or("none")
                    );
                    stages.advance(BridgeStage::CompletedFailure)?;
                    crate::metrics::record_bridge_execution(kind, RouteStatus::Failure);
                    return Err(e);
                }
                e => (RouteStatus::Failure, Some(e.to_string())),
            },
        };

        let terminal = match status {
            RouteStatus::Success => BridgeStage::CompletedSuccess,
            RouteStatus::Failure => BridgeStage::CompletedFailure,
        };
        stages.advance(terminal)?;
        crate::metrics::record_bridge_execution(kind, status);

        Ok(Execution {
            plan,
            tx_hash,
            status,
            failure,
        })
    }

    /// One address per chain the route touches, resolved concurrently
    async fn route_addresses(&self, plan: &RoutePlan) -> OrchestratorResult<Vec<ChainAddress>> {
        let locator = self.registry.locator();

        try_join_all(plan.required_chain_ids.iter().map(|chain_id| async move {
            let chain_name = locator.name_for_id(chain_id)?;
            let address = self.wallet_address(chain_name).await?;
            Ok::<_, OrchestratorError>(ChainAddress {
                chain_id: chain_id.clone(),
                address,
            })
        }))
        .await
    }

    fn finish(
        &self,
        leg: &Leg<'_>,
        execution: Execution,
        from_symbol: String,
        from_amount: String,
        to_symbol: String,
        to_chain_name: String,
    ) -> SwapResult {
        let result = SwapResult {
            transfer: TransferResult {
                from: leg.sender.clone(),
                to: leg.receiver.clone(),
                tx_hash: execution.tx_hash,
                fee_paid: None,
            },
            from_symbol,
            from_amount,
            to_symbol,
            to_chain_name,
            status: execution.status,
            estimated_amount_out: execution.plan.estimated_amount_out,
            failure: execution.failure,
        };

        if result.is_success() {
            info!("{}", result.summary());
        } else {
            warn!(
                "{} ({})",
                result.summary(),
                result.failure.as_deref().unwrap_or("unknown failure")
            );
        }
        result
    }

    fn source_asset(
        &self,
        symbol: &str,
        explicit_denom: Option<&str>,
        chain_name: &str,
    ) -> OrchestratorResult<&AssetDescriptor> {
        let resolver = self.registry.resolver();
        match explicit_denom {
            Some(denom) => resolver.by_denom(denom, chain_name),
            None => resolver.resolve(symbol, chain_name),
        }
    }

    async fn wallet_address(&self, chain_name: &str) -> OrchestratorResult<String> {
        self.wallet
            .address_for(chain_name)
            .await?
            .ok_or_else(|| OrchestratorError::WalletAddressUnavailable {
                chain_name: chain_name.to_string(),
            })
    }
}
