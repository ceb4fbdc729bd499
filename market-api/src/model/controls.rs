use serde::{Deserialize, Serialize};

/// Operator-tunable bias applied uniformly to all instruments each tick.
///
/// Both values are always written together; there is no partial update.
/// No range is enforced: out-of-range values simply produce more extreme
/// or frozen markets. This is an operator override, not user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalControls {
    /// Percent added to every instrument's change each tick.
    /// 1.0 is roughly 1% of upward pressure per tick.
    pub market_trend: f64,

    /// Multiplier applied to every instrument's volatility.
    /// 0 freezes the random component entirely.
    pub volatility_multiplier: f64,
}

impl Default for GlobalControls {
    fn default() -> Self {
        Self {
            market_trend: 0.0,
            volatility_multiplier: 1.0,
        }
    }
}
