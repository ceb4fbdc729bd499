//! Portfolio valuation: cash plus holdings marked at current prices.

use crate::store::MemoryStore;
use market::MarketError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Valuation {
    pub cash: i64,
    /// Sum of quantity * current price over the account's holdings.
    /// A symbol that no longer resolves contributes 0.
    pub holdings_value: i64,
    pub total_value: i64,
}

/// Pure read: no side effects, no locks beyond the account's own.
/// Prices are an eventually-consistent snapshot; a tick racing this call
/// is fine.
pub fn valuate(store: &MemoryStore, account_id: u64) -> Result<Valuation, MarketError> {
    let record = store.account_record(account_id)?;
    let record = record.lock().unwrap();

    let mut holdings_value = 0i64;
    for holding in record.holdings.values() {
        if let Some(instrument) = store.instrument(&holding.symbol) {
            holdings_value += instrument.price() * i64::from(holding.quantity);
        }
    }

    let cash = record.account.cash();
    Ok(Valuation {
        cash,
        holdings_value,
        total_value: cash + holdings_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use market::model::{Category, Instrument, Side, INITIAL_CASH};

    fn setup() -> (MemoryStore, u64) {
        let store = MemoryStore::new();
        store.insert_instrument_if_absent(Instrument::new(
            "A",
            "A Co",
            Category::Equity,
            1_000,
            0.05,
            0.0,
        ));
        let id = store.create_account("trader", "hash").unwrap().id();
        (store, id)
    }

    #[test]
    fn valuation_marks_holdings_at_current_price() {
        let (store, id) = setup();
        ledger::execute(&store, id, "A", 10, Side::Buy).unwrap();

        // Price doubles after the buy.
        store.update_instrument("A", |i| i.apply_tick(2_000, 1_000, 100.0)).unwrap();

        let v = valuate(&store, id).unwrap();
        assert_eq!(v.cash, INITIAL_CASH - 10_000);
        assert_eq!(v.holdings_value, 20_000);
        assert_eq!(v.total_value, v.cash + v.holdings_value);
    }

    #[test]
    fn valuation_is_idempotent_without_intervening_activity() {
        let (store, id) = setup();
        ledger::execute(&store, id, "A", 3, Side::Buy).unwrap();

        let first = valuate(&store, id).unwrap();
        let second = valuate(&store, id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cash_only_account_values_at_cash() {
        let (store, id) = setup();
        let v = valuate(&store, id).unwrap();
        assert_eq!(v.cash, INITIAL_CASH);
        assert_eq!(v.holdings_value, 0);
        assert_eq!(v.total_value, INITIAL_CASH);
    }

    #[test]
    fn unknown_account_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            valuate(&store, 1).unwrap_err(),
            MarketError::NotFound(_)
        ));
    }
}
