//! Defines the data model for tradable instruments.
//!
//! An `Instrument` is a synthetic symbol whose price is advanced by the
//! simulator once per tick. Prices are positive integers in currency
//! minor units; they are floored at 1 and never reach zero.

use serde::{Deserialize, Serialize};

/// Broad grouping of an instrument, used for display and catalog seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Equity,
    Fund,
    Index,
}

/// A tradable instrument with its current simulated price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// The unique ticker symbol (e.g., "RLSA").
    symbol: String,

    /// Human-readable display name.
    name: String,

    category: Category,

    /// Current price in currency minor units. Always >= 1.
    price: i64,

    /// Absolute price change applied by the last tick.
    change: i64,

    /// Percent change applied by the last tick, rounded to 2 decimals.
    change_percent: f64,

    /// Baseline per-tick volatility as a fraction (e.g., 0.05).
    volatility: f64,

    /// Baseline directional bias added to every tick's percent change.
    trend: f64,

    /// Operator override for volatility. Durable: survives a catalog reseed.
    volatility_override: Option<f64>,

    /// Operator override for trend. Durable: survives a catalog reseed.
    trend_override: Option<f64>,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        price: i64,
        volatility: f64,
        trend: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            category,
            price,
            change: 0,
            change_percent: 0.0,
            volatility,
            trend,
            volatility_override: None,
            trend_override: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn change(&self) -> i64 {
        self.change
    }

    pub fn change_percent(&self) -> f64 {
        self.change_percent
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Volatility the simulator should use: operator override if set,
    /// otherwise the baseline.
    pub fn effective_volatility(&self) -> f64 {
        self.volatility_override.unwrap_or(self.volatility)
    }

    /// Trend the simulator should use: operator override if set,
    /// otherwise the baseline.
    pub fn effective_trend(&self) -> f64 {
        self.trend_override.unwrap_or(self.trend)
    }

    /// Applies the outcome of one simulation tick.
    ///
    /// The caller guarantees `price >= 1` and `change == price - old_price`.
    pub fn apply_tick(&mut self, price: i64, change: i64, change_percent: f64) {
        self.price = price;
        self.change = change;
        self.change_percent = change_percent;
    }

    /// Sets operator overrides. `None` arguments leave the corresponding
    /// override untouched, so volatility and trend can be adjusted
    /// independently.
    pub fn set_overrides(&mut self, volatility: Option<f64>, trend: Option<f64>) {
        if let Some(v) = volatility {
            self.volatility_override = Some(v);
        }
        if let Some(t) = trend {
            self.trend_override = Some(t);
        }
    }
}
