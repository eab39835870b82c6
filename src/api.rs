//! HTTP API
//!
//! axum routes over the gateway services. Handlers only validate input
//! and map service results to status codes; all chain access goes
//! through the shared [`AppState`].

use crate::blocks::BlockService;
use crate::client::ChainClient;
use crate::error::{ChainError, GasPriceError, PriceError, ValidationError};
use crate::gas::{GasPriceCache, GasRefreshControl};
use crate::pool::PriceEngine;
use crate::tokens::{parse_address, TokenRegistry};
use crate::types::{BlockRecord, TransferRecord};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Services shared by every request
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<str>,
    pub tokens: Arc<TokenRegistry>,
    pub prices: Arc<PriceEngine>,
    pub blocks: Arc<BlockService>,
    pub gas: Arc<GasPriceCache>,
    pub gas_refresh: Arc<GasRefreshControl>,
}

impl AppState {
    pub fn new(client: Arc<dyn ChainClient>, gas_cache_ttl: Duration, provider: &str) -> Self {
        let tokens = Arc::new(TokenRegistry::new(Arc::clone(&client)));
        let prices = Arc::new(PriceEngine::new(Arc::clone(&client), Arc::clone(&tokens)));
        let blocks = Arc::new(BlockService::new(Arc::clone(&client)));
        let gas = Arc::new(GasPriceCache::new(client, gas_cache_ttl));
        let gas_refresh = Arc::new(GasRefreshControl::new(Arc::clone(&gas)));

        Self {
            provider: Arc::from(provider),
            tokens,
            prices,
            blocks,
            gas,
            gas_refresh,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/block/latestBlockNumber", get(latest_block_number))
        .route("/block/blockByNumber/:number", get(block_by_number))
        .route("/block/largeTransfer/:number/:threshold", get(large_transfers))
        .route("/block/gasPrice", get(gas_price))
        .route("/block/gasPrice/autoRefresh", post(toggle_gas_refresh))
        .route(
            "/contract/getPriceFromDex/:dex/:token_a/:token_b",
            get(price_from_dex),
        )
        .with_state(state)
}

/// Error body `{ "message": ... }` with the matching status
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<PriceError> for ApiError {
    fn from(e: PriceError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<GasPriceError> for ApiError {
    fn from(e: GasPriceError) -> Self {
        ApiError::Unavailable(e.to_string())
    }
}

impl From<ChainError> for ApiError {
    fn from(e: ChainError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResp {
    status: &'static str,
    provider: String,
    cached_tokens: usize,
    gas_auto_refresh: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        provider: state.provider.to_string(),
        cached_tokens: state.tokens.cached_len(),
        gas_auto_refresh: state.gas_refresh.is_running().await,
    })
}

async fn latest_block_number(State(state): State<AppState>) -> Result<Json<u64>, ApiError> {
    let block_number = state.blocks.latest_block_number().await?;
    Ok(Json(block_number))
}

#[derive(Deserialize)]
struct BlockParams {
    full: Option<bool>,
}

async fn block_by_number(
    State(state): State<AppState>,
    Path(number): Path<u64>,
    Query(params): Query<BlockParams>,
) -> Json<Option<BlockRecord>> {
    let block = if params.full.unwrap_or(false) {
        state.blocks.block_with_transactions(number).await
    } else {
        state.blocks.block(number).await
    };
    Json(block)
}

async fn large_transfers(
    State(state): State<AppState>,
    Path((number, threshold)): Path<(u64, String)>,
) -> Result<Json<Vec<TransferRecord>>, ApiError> {
    let transfers = state.blocks.large_transfers(number, &threshold).await?;
    Ok(Json(transfers))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GasPriceResp {
    gas_price_gwei: String,
    fetched_at: DateTime<Utc>,
}

async fn gas_price(State(state): State<AppState>) -> Result<Json<GasPriceResp>, ApiError> {
    let entry = state.gas.current_entry().await?;
    Ok(Json(GasPriceResp {
        gas_price_gwei: entry.value_gwei,
        fetched_at: entry.fetched_at,
    }))
}

#[derive(Serialize)]
struct ToggleResp {
    enabled: bool,
}

async fn toggle_gas_refresh(State(state): State<AppState>) -> Json<ToggleResp> {
    Json(ToggleResp {
        enabled: state.gas_refresh.toggle().await,
    })
}

#[derive(Serialize)]
struct PriceResp {
    price: f64,
}

async fn price_from_dex(
    State(state): State<AppState>,
    Path((dex, token_a, token_b)): Path<(String, String, String)>,
) -> Result<Json<PriceResp>, ApiError> {
    let token_a = parse_address(&token_a)?;
    let token_b = parse_address(&token_b)?;

    let price = state.prices.price_of(&dex, token_a, token_b).await?;
    Ok(Json(PriceResp { price }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{block_with, transfer_tx, MockChainClient};
    use alloy::primitives::utils::parse_ether;
    use alloy::primitives::address;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    const USDC_WETH_PAIR: alloy::primitives::Address =
        address!("B4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc");
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

    fn app(client: MockChainClient) -> (Arc<MockChainClient>, AppState) {
        let client = Arc::new(client);
        let state = AppState::new(client.clone(), Duration::from_millis(5000), "Alchemy");
        (client, state)
    }

    async fn send(state: &AppState, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
        send(state, Method::GET, uri).await
    }

    #[tokio::test]
    async fn test_price_route() {
        let (_, state) = app(MockChainClient::new().with_reserves(
            USDC_WETH_PAIR,
            25_000_000_000_000,
            10_000_000_000_000_000_000_000,
        ));

        let (status, body) = get(
            &state,
            &format!("/contract/getPriceFromDex/UniswapV2/{}/{}", WETH, USDC),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 2500.0);
    }

    #[tokio::test]
    async fn test_malformed_address_is_400_without_rpc() {
        let (client, state) = app(MockChainClient::new());

        let (status, body) = get(
            &state,
            &format!("/contract/getPriceFromDex/UniswapV2/0x1234/{}", USDC),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("0x1234"));
        assert_eq!(client.contract_call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_dex_is_500() {
        let (_, state) = app(MockChainClient::new());

        let (status, body) = get(
            &state,
            &format!("/contract/getPriceFromDex/sushiswap/{}/{}", WETH, USDC),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Unsupported DEX: sushiswap");
    }

    #[tokio::test]
    async fn test_gas_price_route() {
        let (_, state) = app(MockChainClient::new().with_gas_price_wei(12_345_678_901));

        let (status, body) = get(&state, "/block/gasPrice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gasPriceGwei"], "12.345678901");
        let fetched_at = body["fetchedAt"].as_str().unwrap();
        assert!(fetched_at.parse::<DateTime<Utc>>().is_ok(), "{fetched_at}");
    }

    #[tokio::test]
    async fn test_gas_price_unavailable_is_503() {
        let (_, state) = app(MockChainClient::new());

        let (status, _) = get(&state, "/block/gasPrice").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_toggle_auto_refresh() {
        let (_, state) = app(MockChainClient::new().with_gas_price_wei(1_000_000_000));

        let (_, on) = send(&state, Method::POST, "/block/gasPrice/autoRefresh").await;
        let (_, health) = get(&state, "/health").await;
        let (_, off) = send(&state, Method::POST, "/block/gasPrice/autoRefresh").await;

        assert_eq!(on["enabled"], true);
        assert_eq!(health["gasAutoRefresh"], true);
        assert_eq!(off["enabled"], false);
    }

    #[tokio::test]
    async fn test_block_routes() {
        let txs = vec![
            transfer_tx(1, parse_ether("0.5").unwrap()),
            transfer_tx(2, parse_ether("3").unwrap()),
        ];
        let (_, state) = app(MockChainClient::new().with_block(block_with(42, txs)));

        let (_, latest) = get(&state, "/block/latestBlockNumber").await;
        assert_eq!(latest, 42);

        let (_, block) = get(&state, "/block/blockByNumber/42").await;
        assert_eq!(block["number"], 42);
        assert!(block["transactions"][0].is_string());

        let (_, full) = get(&state, "/block/blockByNumber/42?full=true").await;
        assert!(full["transactions"][0].is_object());

        let (status, missing) = get(&state, "/block/blockByNumber/43").await;
        assert_eq!(status, StatusCode::OK);
        assert!(missing.is_null());

        let (_, transfers) = get(&state, "/block/largeTransfer/42/1").await;
        assert_eq!(transfers.as_array().unwrap().len(), 1);
        assert_eq!(transfers[0]["value"], "3.0");
    }

    #[tokio::test]
    async fn test_bad_threshold_is_400() {
        let (client, state) = app(MockChainClient::new());

        let (status, _) = get(&state, "/block/largeTransfer/42/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(client.block_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let (_, state) = app(MockChainClient::new());

        let (status, body) = get(&state, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "Alchemy");
        assert_eq!(body["cachedTokens"], 0);
    }
}
