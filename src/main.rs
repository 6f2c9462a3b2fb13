// stakecast - stake-weighted prediction market ledger
// axum entry point: router, CORS, shared state, oracle wiring.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

mod amm;
mod amount;
mod app_state;
mod balances;
mod engine;
mod error;
mod handlers;
mod market;
mod models;
mod oracle;
mod positions;
mod query;
mod settlement;

use app_state::{AppState, SharedState};
use handlers::*;
use oracle::{HttpOracle, Oracle, ScriptedOracle};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let oracle: Arc<dyn Oracle> = match HttpOracle::from_env() {
        Some(http) => Arc::new(http),
        None => {
            warn!("RESOLVER_URL not set; resolutions will be inconclusive");
            Arc::new(ScriptedOracle::new())
        }
    };
    info!(oracle = oracle.source_name(), "oracle configured");

    let state: SharedState = AppState::shared(oracle);

    let app = Router::new()
        // ===== MARKETS =====
        .route("/markets", get(list_markets).post(create_market))
        .route("/markets/trending", get(get_trending))
        .route("/markets/:id", get(get_market))
        .route("/markets/:id/stake", post(place_stake))
        .route("/markets/:id/resolve", post(resolve_market))
        // ===== LEDGER =====
        .route("/withdraw", post(withdraw))
        .route("/positions/:owner", get(get_positions))
        .route("/balance/:owner", get(get_balance))
        // ===== HEALTH =====
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let port: u16 = std::env::var("STAKECAST_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4242);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "stakecast listening");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("server error: {}", e);
        std::process::exit(1);
    }
}
