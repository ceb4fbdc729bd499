//! The market clock: advances every instrument's price one step per tick.
//!
//! The simulator is stateless between ticks — everything it needs comes
//! from the store, the explicitly passed controls and the injected random
//! source. Cadence is the scheduler's problem; mutual exclusion of ticks
//! is the caller's problem (the server guards the simulator with a
//! try-lock and skips overlapping triggers).

use crate::store::MemoryStore;
use log::{debug, warn};
use market::model::{GlobalControls, Instrument, PricePoint};
use market::MarketError;
use rand::Rng;

/// How many history rows to keep per symbol.
pub const DEFAULT_HISTORY_RETENTION: usize = 20;

/// Chance per instrument per tick that the history table is pruned.
/// Pruning every tick would double the write volume for no benefit; a
/// short burst above the retention target is acceptable.
pub const DEFAULT_PRUNE_PROBABILITY: f64 = 0.1;

pub struct Simulator {
    prune_probability: f64,
    history_retention: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(DEFAULT_PRUNE_PROBABILITY, DEFAULT_HISTORY_RETENTION)
    }
}

/// Outcome of one tick. Per-instrument failures are collected here rather
/// than aborting the cycle: one bad row must not stall the whole market.
#[derive(Debug, Default)]
pub struct TickReport {
    pub updated: usize,
    pub errors: Vec<(String, MarketError)>,
}

impl Simulator {
    pub fn new(prune_probability: f64, history_retention: usize) -> Self {
        Self {
            prune_probability,
            history_retention,
        }
    }

    /// Advances every instrument once.
    ///
    /// Controls are read once by the caller and passed in, so a mid-tick
    /// operator update applies only from the next tick on.
    pub fn tick<R: Rng>(
        &self,
        store: &MemoryStore,
        controls: GlobalControls,
        rng: &mut R,
    ) -> TickReport {
        let mut report = TickReport::default();

        for instrument in store.instruments() {
            let symbol = instrument.symbol().to_string();
            match self.tick_instrument(store, &instrument, controls, rng) {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    warn!("tick failed for {symbol}: {e}");
                    report.errors.push((symbol, e));
                }
            }
        }

        debug!(
            "tick complete: {} updated, {} failed",
            report.updated,
            report.errors.len()
        );
        report
    }

    fn tick_instrument<R: Rng>(
        &self,
        store: &MemoryStore,
        instrument: &Instrument,
        controls: GlobalControls,
        rng: &mut R,
    ) -> Result<(), MarketError> {
        let old_price = instrument.price();

        // Random component, bounded by effective volatility. A multiplier
        // of 0 freezes it, leaving only the bias terms.
        let volatility = instrument.effective_volatility() * controls.volatility_multiplier;
        let mut percent = rng.gen_range(-1.0..1.0) * volatility * 100.0;

        // Directional bias: global trend plus the instrument's own.
        percent += controls.market_trend + instrument.effective_trend();

        let change = (old_price as f64 * percent / 100.0).round() as i64;

        // Floor at 1 unit: a price never reaches zero or goes negative.
        let new_price = (old_price + change).max(1);

        // Record the change the price actually took, which differs from
        // the raw draw when the floor clamps it.
        let applied_change = new_price - old_price;
        let rounded_percent = (percent * 100.0).round() / 100.0;

        store.update_instrument(instrument.symbol(), |i| {
            i.apply_tick(new_price, applied_change, rounded_percent)
        })?;

        store.append_history(PricePoint::new(
            instrument.symbol(),
            new_price,
            chrono::Utc::now().timestamp_millis(),
        ));

        if rng.gen::<f64>() < self.prune_probability {
            let removed = store.prune_history(instrument.symbol(), self.history_retention);
            if removed > 0 {
                debug!("pruned {removed} history row(s) for {}", instrument.symbol());
            }
        }

        Ok(())
    }
}
