use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use market::model::{
    Account, GlobalControls, Holding, Instrument, Side, Transaction, INITIAL_CASH,
};
use market::MarketError;
use market_core::{auth, ledger, valuation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How many transactions the portfolio view returns, newest first.
const RECENT_TRANSACTIONS: usize = 20;

pub async fn health_check() -> &'static str {
    "OK"
}

// ---- Market data ----

pub async fn list_stocks(State(state): State<AppState>) -> Json<Vec<Instrument>> {
    Json(state.store.instruments())
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct HistoryEntry {
    price: i64,
    time: i64,
}

pub async fn stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    if state.store.instrument(&symbol).is_none() {
        return Err(MarketError::NotFound(format!("instrument {symbol}")).into());
    }

    let limit = query.limit.unwrap_or(12);
    let entries = state
        .store
        .history(&symbol, limit)
        .into_iter()
        .map(|p| HistoryEntry {
            price: p.price,
            time: p.timestamp,
        })
        .collect();
    Ok(Json(entries))
}

// ---- Administration ----

pub async fn force_simulate(State(state): State<AppState>) -> Json<Value> {
    let report = {
        let mut runner = state.runner.lock().unwrap();
        runner.run(&state.store)
    };
    let errors: Vec<String> = report
        .errors
        .iter()
        .map(|(symbol, e)| format!("{symbol}: {e}"))
        .collect();
    Json(json!({ "updated": report.updated, "errors": errors }))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<GlobalControls> {
    Json(state.store.global_controls())
}

/// Both fields are required: the pair is overwritten atomically. A caller
/// that wants to keep one value re-submits it.
pub async fn set_settings(
    State(state): State<AppState>,
    Json(controls): Json<GlobalControls>,
) -> Json<Value> {
    state.store.set_global_controls(controls);
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    symbol: String,
    volatility: Option<f64>,
    trend: Option<f64>,
}

pub async fn set_stock_override(
    State(state): State<AppState>,
    Json(req): Json<OverrideRequest>,
) -> Result<Json<Instrument>, ApiError> {
    let updated = state
        .store
        .update_instrument(&req.symbol, |i| i.set_overrides(req.volatility, req.trend))?;
    Ok(Json(updated))
}

// ---- Accounts ----

#[derive(Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<Account>, ApiError> {
    let account = auth::register(&state.store, &req.username, &req.password)?;
    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let account = auth::authenticate(&state.store, &req.username, &req.password)?;
    let holdings = holdings_snapshot(&state, account.id())?;
    Ok(Json(json!({ "account": account, "holdings": holdings })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<Value>, ApiError> {
    auth::delete_account(&state.store, &req.username, &req.password)?;
    Ok(Json(json!({ "status": "ok" })))
}

// ---- Portfolio & trading ----

pub async fn portfolio(
    State(state): State<AppState>,
    Path(account_id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let (cash, holdings, transactions) = {
        let record = state.store.account_record(account_id)?;
        let record = record.lock().unwrap();
        let mut transactions: Vec<Transaction> = record
            .transactions
            .iter()
            .rev()
            .take(RECENT_TRANSACTIONS)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut holdings: Vec<Holding> = record.holdings.values().cloned().collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        (record.account.cash(), holdings, transactions)
    };

    // Valuation re-reads prices outside the account lock; display reads
    // are eventually-consistent snapshots.
    let valuation = valuation::valuate(&state.store, account_id)?;
    let profit = valuation.total_value - INITIAL_CASH;

    Ok(Json(json!({
        "cash": cash,
        "holdings": holdings,
        "valuation": valuation,
        "profit": profit,
        "transactions": transactions,
    })))
}

#[derive(Deserialize)]
pub struct TradeRequest {
    account_id: u64,
    symbol: String,
    quantity: u32,
    side: Side,
}

pub async fn trade(
    State(state): State<AppState>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let tx = ledger::execute(
        &state.store,
        req.account_id,
        &req.symbol,
        req.quantity,
        req.side,
    )?;
    Ok(Json(tx))
}

fn holdings_snapshot(state: &AppState, account_id: u64) -> Result<Vec<Holding>, MarketError> {
    let record = state.store.account_record(account_id)?;
    let record = record.lock().unwrap();
    let mut holdings: Vec<Holding> = record.holdings.values().cloned().collect();
    holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(holdings)
}
