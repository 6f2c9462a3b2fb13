// HTTP request handlers for the stakecast API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::amount::Amount;
use crate::app_state::SharedState;
use crate::error::MarketError;
use crate::market::{Category, MarketStatus};
use crate::models::*;
use crate::query;

type ApiError = (StatusCode, Json<Value>);

fn reject(error: MarketError) -> ApiError {
    (
        error.status_code(),
        Json(json!({ "success": false, "error": error.to_string() })),
    )
}

fn parse_status(s: &str) -> Result<MarketStatus, MarketError> {
    match s {
        "active" => Ok(MarketStatus::Active),
        "resolved" => Ok(MarketStatus::Resolved),
        "cancelled" => Ok(MarketStatus::Cancelled),
        _ => Err(MarketError::InvalidStatus(s.to_string())),
    }
}

// ===== MUTATING ENDPOINTS =====

pub async fn create_market(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMarketRequest>,
) -> Result<Json<Value>, ApiError> {
    let category: Category = payload.category.parse().map_err(reject)?;
    let min_stake = Amount::from_unit_str(&payload.min_stake).map_err(reject)?;

    let mut app = state.lock().await;
    let market_id = app
        .engine
        .create_market(
            payload.title,
            payload.description,
            category,
            payload.resolution_deadline,
            payload.resolution_source,
            payload.outcomes,
            min_stake,
            payload.creator,
            Utc::now().timestamp() as u64,
        )
        .map_err(reject)?;

    Ok(Json(json!({ "success": true, "market_id": market_id })))
}

pub async fn place_stake(
    State(state): State<SharedState>,
    Path(market_id): Path<String>,
    Json(payload): Json<StakeRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut app = state.lock().await;
    let receipt = app
        .engine
        .stake(&payload.staker, &market_id, &payload.outcome_id, payload.amount)
        .map_err(reject)?;

    Ok(Json(json!({
        "success": true,
        "market_id": receipt.market_id,
        "outcome_id": receipt.outcome_id,
        "amount": receipt.amount,
        "entry_price": receipt.entry_price,
        "shares_issued": receipt.shares_issued,
    })))
}

pub async fn resolve_market(
    State(state): State<SharedState>,
    Path(market_id): Path<String>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut app = state.lock().await;
    let oracle = app.oracle.clone();
    app.engine
        .resolve(&market_id, &payload.requester, oracle.as_ref())
        .await
        .map_err(reject)?;

    let detail = query::market_detail(&app.engine, &market_id).map_err(reject)?;
    Ok(Json(json!({
        "success": true,
        "market_id": market_id,
        "resolved_outcome_id": detail.resolved_outcome_id,
        "resolution_record": detail.resolution_record,
    })))
}

pub async fn withdraw(
    State(state): State<SharedState>,
    Json(payload): Json<WithdrawRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut app = state.lock().await;
    let withdrawn = app.engine.withdraw(&payload.owner).map_err(reject)?;
    Ok(Json(json!({
        "success": true,
        "owner": payload.owner,
        "withdrawn": withdrawn,
    })))
}

// ===== READ-ONLY ENDPOINTS =====

pub async fn list_markets(
    State(state): State<SharedState>,
    Query(params): Query<ListMarketsParams>,
) -> Result<Json<Value>, ApiError> {
    let category = match params.category.as_deref() {
        None | Some("") => None,
        Some(s) => Some(s.parse::<Category>().map_err(reject)?),
    };
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(parse_status(s).map_err(reject)?),
    };

    let app = state.lock().await;
    let markets = query::list_markets(&app.engine, category, status);
    Ok(Json(json!({ "markets": markets })))
}

pub async fn get_market(
    State(state): State<SharedState>,
    Path(market_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let app = state.lock().await;
    let detail = query::market_detail(&app.engine, &market_id).map_err(reject)?;
    Ok(Json(json!({ "market": detail })))
}

pub async fn get_trending(State(state): State<SharedState>) -> Json<Value> {
    let app = state.lock().await;
    Json(json!({ "markets": query::trending(&app.engine) }))
}

pub async fn get_positions(
    State(state): State<SharedState>,
    Path(owner): Path<String>,
) -> Json<Value> {
    let app = state.lock().await;
    let positions = query::list_positions(&app.engine, &owner);
    Json(json!({ "owner": owner, "positions": positions }))
}

pub async fn get_balance(
    State(state): State<SharedState>,
    Path(owner): Path<String>,
) -> Json<Value> {
    let app = state.lock().await;
    let balance = app.engine.balance_of(&owner);
    Json(json!({ "owner": owner, "balance": balance }))
}

pub async fn health_check() -> &'static str {
    "stakecast prediction market ledger - online"
}
