use super::*;
use crate::store::MemoryStore;
use market::model::{Category, Instrument, INITIAL_CASH};
use std::sync::Arc;

fn store_with_instrument(symbol: &str, price: i64) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_instrument_if_absent(Instrument::new(
        symbol,
        symbol,
        Category::Equity,
        price,
        0.05,
        0.0,
    ));
    store
}

fn register(store: &MemoryStore) -> u64 {
    store.create_account("trader", "hash").unwrap().id()
}

fn cash_of(store: &MemoryStore, id: u64) -> i64 {
    store.account_record(id).unwrap().lock().unwrap().account.cash()
}

fn holding_of(store: &MemoryStore, id: u64, symbol: &str) -> Option<market::model::Holding> {
    store
        .account_record(id)
        .unwrap()
        .lock()
        .unwrap()
        .holdings
        .get(symbol)
        .cloned()
}

#[test]
fn buy_debits_cash_and_creates_holding() {
    let store = store_with_instrument("A", 1_000);
    let id = register(&store);

    let tx = execute(&store, id, "A", 10, Side::Buy).unwrap();
    assert_eq!(tx.price, 1_000);
    assert_eq!(tx.total, 10_000);
    assert_eq!(cash_of(&store, id), INITIAL_CASH - 10_000);

    let holding = holding_of(&store, id, "A").unwrap();
    assert_eq!(holding.quantity, 10);
    assert_eq!(holding.avg_price, 1_000);
}

#[test]
fn buy_then_sell_round_trip_restores_cash() {
    let store = store_with_instrument("A", 1_000);
    let id = register(&store);

    execute(&store, id, "A", 7, Side::Buy).unwrap();
    execute(&store, id, "A", 7, Side::Sell).unwrap();

    assert_eq!(cash_of(&store, id), INITIAL_CASH);
    // Quantity reached exactly zero, so the row is gone.
    assert!(holding_of(&store, id, "A").is_none());
}

#[test]
fn repeated_buys_recompute_weighted_average() {
    let store = store_with_instrument("A", 100);
    let id = register(&store);

    execute(&store, id, "A", 10, Side::Buy).unwrap();
    store.update_instrument("A", |i| i.apply_tick(200, 100, 100.0)).unwrap();
    execute(&store, id, "A", 10, Side::Buy).unwrap();

    let holding = holding_of(&store, id, "A").unwrap();
    assert_eq!(holding.quantity, 20);
    assert_eq!(holding.avg_price, 150);
}

#[test]
fn selling_does_not_move_the_average() {
    let store = store_with_instrument("A", 100);
    let id = register(&store);

    execute(&store, id, "A", 10, Side::Buy).unwrap();
    store.update_instrument("A", |i| i.apply_tick(300, 200, 200.0)).unwrap();
    execute(&store, id, "A", 4, Side::Sell).unwrap();

    let holding = holding_of(&store, id, "A").unwrap();
    assert_eq!(holding.quantity, 6);
    assert_eq!(holding.avg_price, 100);
}

#[test]
fn underfunded_buy_is_rejected_without_state_change() {
    let store = store_with_instrument("A", INITIAL_CASH);
    let id = register(&store);

    let err = execute(&store, id, "A", 2, Side::Buy).unwrap_err();
    assert!(matches!(err, MarketError::InsufficientFunds { .. }));

    assert_eq!(cash_of(&store, id), INITIAL_CASH);
    assert!(holding_of(&store, id, "A").is_none());
    let record = store.account_record(id).unwrap();
    assert!(record.lock().unwrap().transactions.is_empty());
}

#[test]
fn overselling_is_rejected_without_state_change() {
    let store = store_with_instrument("A", 100);
    let id = register(&store);
    execute(&store, id, "A", 5, Side::Buy).unwrap();
    let cash_before = cash_of(&store, id);

    let err = execute(&store, id, "A", 6, Side::Sell).unwrap_err();
    assert_eq!(
        err,
        MarketError::InsufficientHoldings {
            requested: 6,
            held: 5
        }
    );

    assert_eq!(cash_of(&store, id), cash_before);
    assert_eq!(holding_of(&store, id, "A").unwrap().quantity, 5);
}

#[test]
fn selling_with_no_position_is_rejected() {
    let store = store_with_instrument("A", 100);
    let id = register(&store);

    let err = execute(&store, id, "A", 1, Side::Sell).unwrap_err();
    assert_eq!(
        err,
        MarketError::InsufficientHoldings {
            requested: 1,
            held: 0
        }
    );
}

#[test]
fn zero_quantity_and_unknown_inputs_are_rejected() {
    let store = store_with_instrument("A", 100);
    let id = register(&store);

    assert!(matches!(
        execute(&store, id, "A", 0, Side::Buy).unwrap_err(),
        MarketError::Validation(_)
    ));
    assert!(matches!(
        execute(&store, id, "NOPE", 1, Side::Buy).unwrap_err(),
        MarketError::NotFound(_)
    ));
    assert!(matches!(
        execute(&store, 999, "A", 1, Side::Buy).unwrap_err(),
        MarketError::NotFound(_)
    ));
}

#[test]
fn transactions_record_the_execution_price() {
    let store = store_with_instrument("A", 1_000);
    let id = register(&store);

    let tx = execute(&store, id, "A", 3, Side::Buy).unwrap();
    assert_eq!(tx.account_id, id);
    assert_eq!(tx.side, Side::Buy);
    assert_eq!(tx.symbol, "A");
    assert_eq!(tx.total, tx.price * i64::from(tx.quantity));

    let record = store.account_record(id).unwrap();
    let record = record.lock().unwrap();
    assert_eq!(record.transactions.len(), 1);
    assert_eq!(record.transactions[0], tx);
}

#[test]
fn concurrent_trades_keep_cash_and_holdings_consistent() {
    // Many racing buys and sells on one account: cash must never go
    // negative and the final holding must equal the net of the trades
    // that actually executed.
    let store = Arc::new(store_with_instrument("A", 10_000));
    let id = register(&store);

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
        handles.push(std::thread::spawn(move || {
            let mut executed = 0u32;
            for _ in 0..50 {
                if execute(&store, id, "A", 1, side).is_ok() {
                    executed += 1;
                }
            }
            (side, executed)
        }));
    }

    let mut bought = 0u32;
    let mut sold = 0u32;
    for handle in handles {
        let (side, executed) = handle.join().unwrap();
        match side {
            Side::Buy => bought += executed,
            Side::Sell => sold += executed,
        }
    }

    let record = store.account_record(id).unwrap();
    let record = record.lock().unwrap();
    let held = record.holdings.get("A").map(|h| h.quantity).unwrap_or(0);

    assert!(record.account.cash() >= 0, "cash must never go negative");
    assert_eq!(held, bought - sold, "holding must equal net executed trades");
    assert_eq!(
        record.account.cash(),
        INITIAL_CASH - 10_000 * i64::from(bought) + 10_000 * i64::from(sold)
    );
    assert_eq!(record.transactions.len(), (bought + sold) as usize);
}
