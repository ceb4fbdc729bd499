use crate::error::MarketError;
use serde::{Deserialize, Serialize};

/// Cash every new account starts with, in currency minor units.
pub const INITIAL_CASH: i64 = 1_000_000;

/// A registered account. The cash balance is mutated exclusively by the
/// ledger and can never go negative.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    id: u64,
    username: String,
    /// Salted password hash. Never serialized into API responses and
    /// never logged.
    #[serde(skip_serializing)]
    password_hash: String,
    cash: i64,
}

impl Account {
    pub fn new(id: u64, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            cash: INITIAL_CASH,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn cash(&self) -> i64 {
        self.cash
    }

    pub fn credit(&mut self, amount: i64) {
        self.cash += amount;
    }

    /// Debits the balance, rejecting the whole amount when it cannot be
    /// covered. No partial debits.
    pub fn debit(&mut self, amount: i64) -> Result<(), MarketError> {
        if self.cash < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }
}

/// An account's position in one instrument.
///
/// A holding only exists while its quantity is positive; the store deletes
/// the row the moment a sell brings it to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u32,
    /// Volume-weighted average cost basis, rounded to the nearest unit.
    /// Only buys move this value; sells leave it unchanged.
    pub avg_price: i64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: u32, avg_price: i64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_price,
        }
    }

    /// Folds a buy into the position, recomputing the volume-weighted
    /// average cost.
    pub fn apply_buy(&mut self, quantity: u32, price: i64) {
        let old_value = self.avg_price * i64::from(self.quantity);
        let new_value = old_value + price * i64::from(quantity);
        let total_quantity = self.quantity + quantity;
        self.avg_price = ((new_value as f64) / f64::from(total_quantity)).round() as i64;
        self.quantity = total_quantity;
    }

    /// Removes sold units, returning the remaining quantity.
    pub fn apply_sell(&mut self, quantity: u32) -> Result<u32, MarketError> {
        if quantity > self.quantity {
            return Err(MarketError::InsufficientHoldings {
                requested: quantity,
                held: self.quantity,
            });
        }
        self.quantity -= quantity;
        Ok(self.quantity)
    }
}
