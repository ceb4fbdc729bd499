//! Account registration, authentication and deletion.
//!
//! Passwords are stored as `salt$hex(sha256(salt || password))` and are
//! never logged. Authentication failures are reported with a single
//! generic error so a caller cannot probe which usernames exist.

use crate::store::MemoryStore;
use log::info;
use market::model::Account;
use market::MarketError;
use rand::Rng;
use sha2::{Digest, Sha256};

const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 20;

/// Registers a new account with the initial cash balance.
pub fn register(store: &MemoryStore, username: &str, password: &str) -> Result<Account, MarketError> {
    validate_username(username)?;
    if password.is_empty() {
        return Err(MarketError::Validation("password must not be empty".into()));
    }

    let salt: String = {
        let mut rng = rand::thread_rng();
        (0..16)
            .map(|_| char::from_digit(rng.gen_range(0..16u32), 16).unwrap_or('0'))
            .collect()
    };
    let account = store.create_account(username, &encode(&salt, password))?;
    info!("registered account {} ({username})", account.id());
    Ok(account)
}

/// Verifies credentials, returning the account on success. Unknown user
/// and wrong password are indistinguishable to the caller.
pub fn authenticate(
    store: &MemoryStore,
    username: &str,
    password: &str,
) -> Result<Account, MarketError> {
    let record = store
        .account_record_by_username(username)
        .map_err(|_| MarketError::AuthenticationFailed)?;
    let record = record.lock().unwrap();

    if verify(record.account.password_hash(), password) {
        Ok(record.account.clone())
    } else {
        Err(MarketError::AuthenticationFailed)
    }
}

/// Verifies the password, then removes the account together with its
/// holdings and transactions.
pub fn delete_account(
    store: &MemoryStore,
    username: &str,
    password: &str,
) -> Result<(), MarketError> {
    let account = authenticate(store, username, password)?;
    store.remove_account(account.id())?;
    info!("deleted account {} ({username})", account.id());
    Ok(())
}

fn validate_username(username: &str) -> Result<(), MarketError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(MarketError::Validation(format!(
            "username must be {USERNAME_MIN}-{USERNAME_MAX} characters"
        )));
    }
    Ok(())
}

fn encode(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{salt}${hex}")
}

fn verify(stored: &str, password: &str) -> bool {
    let Some((salt, _)) = stored.split_once('$') else {
        return false;
    };
    constant_time_eq(encode(salt, password).as_bytes(), stored.as_bytes())
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use market::model::{Category, Instrument, Side, INITIAL_CASH};

    #[test]
    fn register_enforces_username_length() {
        let store = MemoryStore::new();
        assert!(matches!(
            register(&store, "a", "pw").unwrap_err(),
            MarketError::Validation(_)
        ));
        assert!(matches!(
            register(&store, &"x".repeat(21), "pw").unwrap_err(),
            MarketError::Validation(_)
        ));
        assert!(register(&store, "ab", "pw").is_ok());
        assert!(register(&store, &"y".repeat(20), "pw").is_ok());
    }

    #[test]
    fn register_starts_with_initial_cash_and_no_plaintext() {
        let store = MemoryStore::new();
        let account = register(&store, "alice", "s3cret").unwrap();
        assert_eq!(account.cash(), INITIAL_CASH);
        assert!(!account.password_hash().contains("s3cret"));
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        register(&store, "alice", "pw").unwrap();
        assert!(matches!(
            register(&store, "alice", "other").unwrap_err(),
            MarketError::Validation(_)
        ));
    }

    #[test]
    fn authenticate_accepts_correct_password_only() {
        let store = MemoryStore::new();
        let account = register(&store, "alice", "pw").unwrap();

        assert_eq!(authenticate(&store, "alice", "pw").unwrap().id(), account.id());
        assert_eq!(
            authenticate(&store, "alice", "wrong").unwrap_err(),
            MarketError::AuthenticationFailed
        );
        // Unknown user gets the same generic error.
        assert_eq!(
            authenticate(&store, "nobody", "pw").unwrap_err(),
            MarketError::AuthenticationFailed
        );
    }

    #[test]
    fn delete_requires_password_and_removes_everything() {
        let store = MemoryStore::new();
        store.insert_instrument_if_absent(Instrument::new(
            "A",
            "A Co",
            Category::Equity,
            100,
            0.05,
            0.0,
        ));
        let account = register(&store, "alice", "pw").unwrap();
        ledger::execute(&store, account.id(), "A", 1, Side::Buy).unwrap();

        assert_eq!(
            delete_account(&store, "alice", "wrong").unwrap_err(),
            MarketError::AuthenticationFailed
        );
        delete_account(&store, "alice", "pw").unwrap();
        assert!(store.account_record(account.id()).is_err());
    }

    #[test]
    fn same_password_hashes_differently_per_account() {
        let store = MemoryStore::new();
        let a = register(&store, "alice", "pw").unwrap();
        let b = register(&store, "bob", "pw").unwrap();
        // Random salts: equal passwords must not produce equal hashes.
        assert_ne!(a.password_hash(), b.password_hash());
    }
}
