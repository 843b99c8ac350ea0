//! HTTP API over the orchestrators

use crate::chain::{BalanceAggregator, ChainBalances};
use crate::config::{ApiConfig, MetricsConfig};
use crate::coordination::IbcOrchestrator;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::intent::{BridgeTransferRequest, SwapRequest, SwapResult, TransferRequest, TransferResult};
use crate::registry::ChainRegistry;
use crate::tx::TransferOrchestrator;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChainRegistry>,
    pub transfer: Arc<TransferOrchestrator>,
    pub bridge: Arc<IbcOrchestrator>,
    pub balances: Arc<BalanceAggregator>,
}

/// Build the router; `/metrics` is mounted only when metrics are enabled
pub fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/chains", get(get_chains))
        .route("/balances", get(get_balances))
        .route("/transfer", post(post_transfer))
        .route("/ibc/transfer", post(post_ibc_transfer))
        .route("/ibc/swap", post(post_ibc_swap));

    if metrics.enabled {
        app = app.route("/metrics", get(get_metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Run the HTTP API server
pub async fn run_server(
    config: &ApiConfig,
    metrics: &MetricsConfig,
    state: AppState,
) -> OrchestratorResult<()> {
    let app = router(state, metrics);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OrchestratorError::Config(format!("cannot bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| OrchestratorError::Internal(format!("API server error: {}", e)))?;

    Ok(())
}

/// Health check endpoint - basic liveness
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Registered chains
async fn get_chains(State(state): State<AppState>) -> impl IntoResponse {
    let chains = state
        .registry
        .chains()
        .iter()
        .map(|c| ChainSummary {
            chain_name: c.chain_name.clone(),
            chain_id: c.chain_id.clone(),
            pretty_name: c.pretty_name.clone(),
        })
        .collect();
    Json(ChainsResponse { chains })
}

async fn get_balances(State(state): State<AppState>) -> Result<Json<Vec<ChainBalances>>, ApiError> {
    Ok(Json(state.balances.fetch_all().await?))
}

async fn post_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResult>, ApiError> {
    Ok(Json(state.transfer.execute(&request).await?))
}

async fn post_ibc_transfer(
    State(state): State<AppState>,
    Json(request): Json<BridgeTransferRequest>,
) -> Result<Json<SwapResult>, ApiError> {
    Ok(Json(state.bridge.transfer(&request).await?))
}

async fn post_ibc_swap(
    State(state): State<AppState>,
    Json(request): Json<SwapRequest>,
) -> Result<Json<SwapResult>, ApiError> {
    Ok(Json(state.bridge.swap(&request).await?))
}

async fn get_metrics() -> Result<Response, ApiError> {
    let body = crate::metrics::render()?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}

/// Orchestrator error rendered as `{ error, code }`
pub struct ApiError(OrchestratorError);

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_user_actionable() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        warn!("Request failed ({}): {}", self.0.code(), self.0);

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: self.0.code().to_string(),
            }),
        )
            .into_response()
    }
}

// Response types

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    timestamp: String,
}

#[derive(Serialize)]
struct ChainSummary {
    chain_name: String,
    chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pretty_name: Option<String>,
}

#[derive(Serialize)]
struct ChainsResponse {
    chains: Vec<ChainSummary>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Coin, MockBalanceQuerier, MockWalletProvider};
    use crate::route::{MockDenomMapper, MockRouteEngine};

    use axum::{body::Body, http::Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn wallet() -> MockWalletProvider {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_chain_names()
            .returning(|| vec!["osmosis".to_string()]);
        wallet
            .expect_address_for()
            .returning(|_| Ok(Some("osmo1wallet".to_string())));
        wallet
    }

    fn app(engine: MockRouteEngine) -> Router {
        let registry = Arc::new(ChainRegistry::merged(&[]));
        let wallet = Arc::new(wallet());

        let mut querier = MockBalanceQuerier::new();
        querier
            .expect_all_balances()
            .returning(|_, _| Ok(vec![Coin::new(42, "uosmo")]));

        let mut mapper = MockDenomMapper::new();
        mapper
            .expect_map_denom()
            .returning(|_, _, _| Ok("uatom".to_string()));

        let state = AppState {
            registry: registry.clone(),
            transfer: Arc::new(TransferOrchestrator::new(registry.clone(), wallet.clone())),
            bridge: Arc::new(IbcOrchestrator::new(
                registry.clone(),
                wallet.clone(),
                Arc::new(engine),
                Arc::new(mapper),
            )),
            balances: Arc::new(BalanceAggregator::new(registry, wallet, Arc::new(querier))),
        };
        router(state, &MetricsConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn post_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(app(MockRouteEngine::new()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_chains_endpoint() {
        let (status, body) = send(app(MockRouteEngine::new()), get_request("/chains")).await;
        assert_eq!(status, StatusCode::OK);
        let chains = body["chains"].as_array().unwrap();
        assert!(chains.iter().any(|c| c["chain_id"] == "osmosis-1"));
    }

    #[tokio::test]
    async fn test_balances_endpoint() {
        let (status, body) = send(app(MockRouteEngine::new()), get_request("/balances")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["chain_name"], "osmosis");
        assert_eq!(body[0]["balances"][0]["amount"], "42");
    }

    #[tokio::test]
    async fn test_transfer_missing_field_is_bad_request() {
        let request = post_request(
            "/transfer",
            json!({ "chain_name": "osmosis", "symbol": "OSMO", "amount": "1" }),
        );
        let (status, body) = send(app(MockRouteEngine::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FIELD");
        assert_eq!(body["error"], "No receiver address");
    }

    #[tokio::test]
    async fn test_route_failure_is_bad_gateway() {
        let mut engine = MockRouteEngine::new();
        engine
            .expect_route()
            .returning(|_| Err(OrchestratorError::RouteComputationFailed("no route found".into())));

        let request = post_request(
            "/ibc/transfer",
            json!({
                "chain_name": "osmosis",
                "target_chain_name": "cosmoshub",
                "symbol": "OSMO",
                "amount": "1",
                "to_address": "cosmos1receiver"
            }),
        );
        let (status, body) = send(app(engine), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "ROUTE_COMPUTATION_FAILED");
    }

    #[tokio::test]
    async fn test_swap_ambiguity_is_bad_request() {
        let request = post_request(
            "/ibc/swap",
            json!({
                "from_chain_name": "osmosis",
                "from_symbol": "USDC",
                "from_amount": "1",
                "to_symbol": "ATOM",
                "to_chain_name": "cosmoshub"
            }),
        );
        let (status, body) = send(app(MockRouteEngine::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "AMBIGUOUS_ASSET");
        assert!(body["error"].as_str().unwrap().contains("USDC"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let response = app(MockRouteEngine::new()).oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
