use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// An executed trade. Append-only: once written it is never mutated.
/// The canonical read order is timestamp descending (newest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: u64,
    pub side: Side,
    pub symbol: String,
    pub quantity: u32,
    /// Unit price at execution time. The same value the ledger used for
    /// the cash and holding mutations.
    pub price: i64,
    /// quantity * price.
    pub total: i64,
    /// Unix millis.
    pub timestamp: i64,
}

impl Transaction {
    pub fn new(account_id: u64, side: Side, symbol: impl Into<String>, quantity: u32, price: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            side,
            symbol: symbol.into(),
            quantity,
            price,
            total: price * i64::from(quantity),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
