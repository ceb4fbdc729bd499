//! Instrument catalog and startup seeding.
//!
//! Seeding runs once at process startup as an explicit bootstrap step,
//! not lazily on the first request. It is idempotent: an instrument that
//! already exists is left alone, so live prices and operator overrides
//! survive a restart against a shared store.

use crate::store::MemoryStore;
use log::info;
use market::model::{Category, Instrument};

/// The default nine-instrument catalog.
pub fn default_catalog() -> Vec<Instrument> {
    vec![
        Instrument::new("RLSA", "Releassance", Category::Equity, 15_000, 0.05, 0.0),
        Instrument::new("HSR", "Highseer", Category::Equity, 8_500, 0.04, 0.0),
        Instrument::new("MCSC", "Macroscroll", Category::Equity, 42_000, 0.03, 0.0),
        Instrument::new("ENVI", "Envision", Category::Equity, 12_000, 0.06, 0.0),
        Instrument::new("AAR", "Aether Archive", Category::Equity, 2_500, 0.08, 0.0),
        Instrument::new("ARBP", "Big Players Fund", Category::Fund, 10_000, 0.02, 0.0),
        Instrument::new("TFTF", "Tech Focus Fund", Category::Fund, 10_000, 0.04, 0.0),
        Instrument::new("OVTK", "Old Valley Top 1000", Category::Index, 3_000, 0.01, 0.0),
        Instrument::new("BBDS", "Bow Bones Index", Category::Index, 15_000, 0.02, 0.0),
    ]
}

/// Seeds the catalog, returning how many instruments were inserted.
pub fn bootstrap(store: &MemoryStore) -> usize {
    let mut seeded = 0;
    for instrument in default_catalog() {
        if store.insert_instrument_if_absent(instrument) {
            seeded += 1;
        }
    }
    info!("catalog bootstrap: {seeded} instrument(s) seeded");
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let store = MemoryStore::new();
        assert_eq!(bootstrap(&store), 9);
        assert_eq!(bootstrap(&store), 0);
        assert_eq!(store.instruments().len(), 9);
    }

    #[test]
    fn bootstrap_preserves_operator_overrides() {
        let store = MemoryStore::new();
        bootstrap(&store);
        store
            .update_instrument("RLSA", |i| i.set_overrides(Some(0.2), Some(1.0)))
            .unwrap();

        bootstrap(&store);
        let rlsa = store.instrument("RLSA").unwrap();
        assert_eq!(rlsa.effective_volatility(), 0.2);
        assert_eq!(rlsa.effective_trend(), 1.0);
    }
}
