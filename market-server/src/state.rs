use market_core::simulator::{Simulator, TickReport};
use market_core::store::MemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// The simulator together with its random source.
///
/// The scheduler and the force-simulate endpoint both go through the
/// mutex around this; the scheduler uses `try_lock` so an overlapping
/// trigger is skipped instead of queued.
pub struct TickRunner {
    simulator: Simulator,
    rng: StdRng,
}

impl TickRunner {
    pub fn new(simulator: Simulator, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { simulator, rng }
    }

    /// Runs one tick, reading the controls once at the start.
    pub fn run(&mut self, store: &MemoryStore) -> TickReport {
        let controls = store.global_controls();
        self.simulator.tick(store, controls, &mut self.rng)
    }
}

// App State
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub runner: Arc<Mutex<TickRunner>>,
}
