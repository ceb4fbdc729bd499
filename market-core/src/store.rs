//! In-memory data store for the whole market.
//!
//! Layout mirrors the logical tables: instruments and price history keyed
//! by symbol, a single global-controls row, and accounts keyed by id with
//! a unique-username index.
//!
//! Concurrency model: instruments, history and controls sit behind
//! `RwLock`s (short, bounded critical sections). Each account's record —
//! cash, holdings and transaction log together — lives behind its own
//! `Mutex`, which is what serializes concurrent trades on one account
//! while letting different accounts trade fully in parallel.

use market::model::{Account, GlobalControls, Holding, Instrument, PricePoint, Transaction};
use market::MarketError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Everything one account exclusively owns. Locked as a unit so a trade's
/// read-compute-write can never interleave with another trade on the same
/// account.
#[derive(Debug)]
pub struct AccountRecord {
    pub account: Account,
    pub holdings: HashMap<String, Holding>,
    pub transactions: Vec<Transaction>,
}

impl AccountRecord {
    fn new(account: Account) -> Self {
        Self {
            account,
            holdings: HashMap::new(),
            transactions: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    instruments: RwLock<HashMap<String, Instrument>>,
    history: RwLock<HashMap<String, Vec<PricePoint>>>,
    controls: RwLock<Option<GlobalControls>>,
    accounts: RwLock<HashMap<u64, Arc<Mutex<AccountRecord>>>>,
    usernames: RwLock<HashMap<String, u64>>,
    next_account_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_account_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    // ---- Instruments ----

    /// All instruments, sorted by symbol.
    pub fn instruments(&self) -> Vec<Instrument> {
        let table = self.instruments.read().unwrap();
        let mut all: Vec<Instrument> = table.values().cloned().collect();
        all.sort_by(|a, b| a.symbol().cmp(b.symbol()));
        all
    }

    pub fn instrument(&self, symbol: &str) -> Option<Instrument> {
        self.instruments.read().unwrap().get(symbol).cloned()
    }

    /// Seeds an instrument only when the symbol is not already present.
    /// Returns true when the row was inserted. A reseed therefore never
    /// clobbers a live price or an operator override.
    pub fn insert_instrument_if_absent(&self, instrument: Instrument) -> bool {
        let mut table = self.instruments.write().unwrap();
        if table.contains_key(instrument.symbol()) {
            return false;
        }
        table.insert(instrument.symbol().to_string(), instrument);
        true
    }

    /// Applies `apply` to the named instrument under the write lock.
    pub fn update_instrument(
        &self,
        symbol: &str,
        apply: impl FnOnce(&mut Instrument),
    ) -> Result<Instrument, MarketError> {
        let mut table = self.instruments.write().unwrap();
        let instrument = table
            .get_mut(symbol)
            .ok_or_else(|| MarketError::NotFound(format!("instrument {symbol}")))?;
        apply(instrument);
        Ok(instrument.clone())
    }

    // ---- Price history ----

    pub fn append_history(&self, point: PricePoint) {
        let mut table = self.history.write().unwrap();
        table.entry(point.symbol.clone()).or_default().push(point);
    }

    /// The most recent `limit` points for a symbol, oldest first.
    pub fn history(&self, symbol: &str, limit: usize) -> Vec<PricePoint> {
        let table = self.history.read().unwrap();
        match table.get(symbol) {
            Some(points) => {
                let start = points.len().saturating_sub(limit);
                points[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    pub fn history_len(&self, symbol: &str) -> usize {
        self.history
            .read()
            .unwrap()
            .get(symbol)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Drops the oldest points beyond `keep`, returning how many were
    /// removed.
    pub fn prune_history(&self, symbol: &str, keep: usize) -> usize {
        let mut table = self.history.write().unwrap();
        let Some(points) = table.get_mut(symbol) else {
            return 0;
        };
        if points.len() <= keep {
            return 0;
        }
        let excess = points.len() - keep;
        points.drain(..excess);
        excess
    }

    // ---- Global controls ----

    pub fn global_controls(&self) -> GlobalControls {
        self.controls.read().unwrap().unwrap_or_default()
    }

    /// Overwrites both values as a pair. Partial updates are not a store
    /// operation; callers that want to keep one value re-supply it.
    pub fn set_global_controls(&self, controls: GlobalControls) {
        *self.controls.write().unwrap() = Some(controls);
    }

    // ---- Accounts ----

    /// Creates an account with a fresh id, enforcing username uniqueness.
    pub fn create_account(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, MarketError> {
        let mut usernames = self.usernames.write().unwrap();
        if usernames.contains_key(username) {
            return Err(MarketError::Validation(format!(
                "username {username} is already taken"
            )));
        }
        let id = self.next_account_id.fetch_add(1, Ordering::Relaxed);
        let account = Account::new(id, username, password_hash);
        usernames.insert(username.to_string(), id);
        self.accounts
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(AccountRecord::new(account.clone()))));
        Ok(account)
    }

    /// Handle to an account's record. Callers lock it for the duration of
    /// one atomic operation.
    pub fn account_record(&self, id: u64) -> Result<Arc<Mutex<AccountRecord>>, MarketError> {
        self.accounts
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound(format!("account {id}")))
    }

    pub fn account_record_by_username(
        &self,
        username: &str,
    ) -> Result<Arc<Mutex<AccountRecord>>, MarketError> {
        let id = {
            let usernames = self.usernames.read().unwrap();
            usernames.get(username).copied()
        };
        match id {
            Some(id) => self.account_record(id),
            None => Err(MarketError::NotFound(format!("user {username}"))),
        }
    }

    /// Removes the account together with its holdings and transactions.
    /// They live in one record, so they go as one unit.
    pub fn remove_account(&self, id: u64) -> Result<(), MarketError> {
        let record = self.account_record(id)?;
        let username = record.lock().unwrap().account.username().to_string();

        // Same lock order as create_account: usernames, then accounts.
        let mut usernames = self.usernames.write().unwrap();
        let mut accounts = self.accounts.write().unwrap();
        accounts
            .remove(&id)
            .ok_or_else(|| MarketError::NotFound(format!("account {id}")))?;
        usernames.remove(&username);
        Ok(())
    }
}
