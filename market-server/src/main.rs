mod error;
mod routes;
mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use clap::Parser;
use log::{debug, info, warn};
use market_core::simulator::{Simulator, DEFAULT_HISTORY_RETENTION, DEFAULT_PRUNE_PROBABILITY};
use market_core::store::MemoryStore;
use market_core::catalog;
use state::{AppState, TickRunner};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::cors::CorsLayer;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for the HTTP API
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Seconds between simulation ticks
    #[arg(long, default_value_t = 5)]
    tick_interval_secs: u64,

    /// Chance per instrument per tick that its history is pruned
    #[arg(long, default_value_t = DEFAULT_PRUNE_PROBABILITY)]
    prune_probability: f64,

    /// History rows retained per symbol
    #[arg(long, default_value_t = DEFAULT_HISTORY_RETENTION)]
    history_retention: usize,

    /// Seed for the price walk, for reproducible markets
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("=== Market Server Starting ===");

    // 1. Store + explicit catalog bootstrap (no lazy init on first request).
    let store = Arc::new(MemoryStore::new());
    catalog::bootstrap(&store);

    // 2. Simulator behind the tick guard.
    let simulator = Simulator::new(args.prune_probability, args.history_retention);
    let runner = Arc::new(Mutex::new(TickRunner::new(simulator, args.seed)));

    let state = AppState {
        store,
        runner,
    };

    // 3. Tick scheduler. try_lock means an overlapping trigger is a no-op:
    // a slow tick never builds a backlog of pending ticks.
    let scheduler = state.clone();
    let interval = Duration::from_secs(args.tick_interval_secs);
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        loop {
            timer.tick().await;
            match scheduler.runner.try_lock() {
                Ok(mut runner) => {
                    let report = runner.run(&scheduler.store);
                    for (symbol, e) in &report.errors {
                        warn!("tick error for {symbol}: {e}");
                    }
                }
                Err(_) => debug!("tick already in flight, skipping trigger"),
            }
        }
    });

    // 4. Routes.
    let app = Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/stocks", get(routes::list_stocks))
        .route("/api/stocks/:symbol/history", get(routes::stock_history))
        .route("/api/admin/simulate", post(routes::force_simulate))
        .route(
            "/api/admin/settings",
            get(routes::get_settings).post(routes::set_settings),
        )
        .route("/api/admin/stocks", post(routes::set_stock_override))
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .route("/api/user", delete(routes::delete_user))
        .route("/api/portfolio/:account_id", get(routes::portfolio))
        .route("/api/trade", post(routes::trade))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    info!("Market server listening on {addr} (tick every {}s)", args.tick_interval_secs);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
