//! Trade execution against the account ledger.
//!
//! Every execution is one atomic unit under the account's lock: cash,
//! holding and transaction log change together or not at all. The
//! instrument price is read exactly once and that single value is used
//! for the cash mutation, the holding mutation and the recorded
//! transaction.

use crate::store::{AccountRecord, MemoryStore};
use log::info;
use market::model::{Holding, Side, Transaction};
use market::MarketError;

/// Executes a buy or sell for `account_id`, returning the recorded
/// transaction.
///
/// No partial fills: an order that cannot be fully covered by cash (buy)
/// or held quantity (sell) is rejected whole, with no state change.
pub fn execute(
    store: &MemoryStore,
    account_id: u64,
    symbol: &str,
    quantity: u32,
    side: Side,
) -> Result<Transaction, MarketError> {
    if quantity == 0 {
        return Err(MarketError::Validation(
            "quantity must be a positive integer".into(),
        ));
    }

    let record = store.account_record(account_id)?;
    let mut record = record.lock().unwrap();

    // Single price read for the whole execution.
    let price = store
        .instrument(symbol)
        .ok_or_else(|| MarketError::NotFound(format!("instrument {symbol}")))?
        .price();

    let transaction = match side {
        Side::Buy => buy(&mut record, account_id, symbol, quantity, price)?,
        Side::Sell => sell(&mut record, account_id, symbol, quantity, price)?,
    };

    info!(
        "account {account_id}: {:?} {quantity} {symbol} @ {price} (total {})",
        side, transaction.total
    );

    record.transactions.push(transaction.clone());
    Ok(transaction)
}

fn buy(
    record: &mut AccountRecord,
    account_id: u64,
    symbol: &str,
    quantity: u32,
    price: i64,
) -> Result<Transaction, MarketError> {
    let total = price * i64::from(quantity);
    record.account.debit(total)?;

    match record.holdings.get_mut(symbol) {
        Some(holding) => holding.apply_buy(quantity, price),
        None => {
            record
                .holdings
                .insert(symbol.to_string(), Holding::new(symbol, quantity, price));
        }
    }

    Ok(Transaction::new(account_id, Side::Buy, symbol, quantity, price))
}

fn sell(
    record: &mut AccountRecord,
    account_id: u64,
    symbol: &str,
    quantity: u32,
    price: i64,
) -> Result<Transaction, MarketError> {
    // No holding at all is the same rejection as not enough of one:
    // no short-selling.
    let Some(holding) = record.holdings.get_mut(symbol) else {
        return Err(MarketError::InsufficientHoldings {
            requested: quantity,
            held: 0,
        });
    };

    let remaining = holding.apply_sell(quantity)?;
    if remaining == 0 {
        // A holding row exists iff its quantity is positive.
        record.holdings.remove(symbol);
    }

    record.account.credit(price * i64::from(quantity));

    Ok(Transaction::new(account_id, Side::Sell, symbol, quantity, price))
}

#[cfg(test)]
mod tests;
