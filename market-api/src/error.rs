use thiserror::Error;

/// Errors surfaced by the market core.
///
/// Business-rule rejections (`InsufficientFunds`, `InsufficientHoldings`)
/// are ordinary outcomes, not retryable faults: the operation performed no
/// state change and the caller should report the rejection as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Malformed input: missing fields, non-positive quantity, bad username length.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown symbol, account or username.
    #[error("{0} not found")]
    NotFound(String),

    /// Buy rejected because the account cannot cover the full cost.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    /// Sell rejected because the account does not hold enough units.
    #[error("insufficient holdings: requested {requested}, held {held}")]
    InsufficientHoldings { requested: u32, held: u32 },

    /// Bad credentials. Deliberately does not say whether the username or
    /// the password was wrong.
    #[error("invalid username or password")]
    AuthenticationFailed,

    /// Unexpected store failure. The caller may retry; the core does not.
    #[error("store error: {0}")]
    Store(String),
}
