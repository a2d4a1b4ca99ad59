//! Data source abstraction over the exchange's signed account endpoints.

use crate::domain::{AccountInfo, Fill, IncomeRecord, Order, PositionRisk, Symbol};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod binance;
pub mod mock;
pub mod signing;

pub use binance::BinanceDataSource;
pub use mock::MockDataSource;
pub use signing::{sign_query, ServerClock};

/// Default row limits when the caller does not pass one.
pub const DEFAULT_TRADES_LIMIT: u32 = 50;
pub const DEFAULT_ORDERS_LIMIT: u32 = 50;
pub const DEFAULT_INCOME_LIMIT: u32 = 100;

/// API key pair for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Both parts are trimmed and must be non-empty.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self, DataSourceError> {
        let api_key = api_key.trim();
        let api_secret = api_secret.trim();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(DataSourceError::MissingCredentials);
        }
        Ok(Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Read-only account data source.
///
/// Implementations handle signing, retry/backoff and rate limiting. Every call
/// is independent; nothing is cached between calls.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Balance summary.
    async fn fetch_account(&self, creds: &Credentials) -> Result<AccountInfo, DataSourceError>;

    /// Positions with non-zero size.
    async fn fetch_positions(
        &self,
        creds: &Credentials,
    ) -> Result<Vec<PositionRisk>, DataSourceError>;

    /// Most recent fills, optionally for one symbol.
    async fn fetch_trades(
        &self,
        creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Fill>, DataSourceError>;

    /// Most recent orders, optionally for one symbol.
    async fn fetch_orders(
        &self,
        creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Order>, DataSourceError>;

    /// Most recent income ledger entries.
    async fn fetch_income(
        &self,
        creds: &Credentials,
        limit: u32,
    ) -> Result<Vec<IncomeRecord>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    #[error("API key and secret must not be empty")]
    MissingCredentials,
    /// Connection failure, timeout, DNS.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Non-success status without a structured exchange error body.
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
    /// Structured `{code, msg}` error returned by the exchange.
    #[error("Exchange error {code}: {msg}")]
    Api { status: u16, code: i64, msg: String },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Rate limited")]
    RateLimited,
}
