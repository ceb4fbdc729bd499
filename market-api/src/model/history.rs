use serde::{Deserialize, Serialize};

/// One recorded price for one instrument at one tick.
///
/// Appended once per tick per symbol and pruned down to a small retention
/// window, so the history table stays bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: String,
    pub price: i64,
    /// Unix millis.
    pub timestamp: i64,
}

impl PricePoint {
    pub fn new(symbol: impl Into<String>, price: i64, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp,
        }
    }
}
