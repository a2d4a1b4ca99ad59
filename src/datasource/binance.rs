//! Binance USDⓈ-M futures REST client.

use super::signing::{signed_query, ServerClock};
use super::{Credentials, DataSource, DataSourceError};
use crate::config::Config;
use crate::domain::{AccountInfo, Fill, IncomeRecord, Order, PositionRisk, Symbol, TimeMs};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Exchange error code for a request timestamp outside the receive window.
const TIMESTAMP_OUT_OF_WINDOW: i64 = -1021;

#[derive(Debug, Deserialize)]
struct ExchangeError {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
    server_time: i64,
}

/// Signed client for the account endpoints of `fapi.binance.com`.
#[derive(Debug, Clone)]
pub struct BinanceDataSource {
    client: Client,
    base_url: String,
    clock: Arc<ServerClock>,
    retry_max_elapsed: Duration,
}

impl BinanceDataSource {
    pub fn new(base_url: String) -> Self {
        Self::with_clock(Client::new(), base_url, Arc::new(ServerClock::new()))
    }

    /// Use an existing HTTP client and clock.
    pub fn with_clock(client: Client, base_url: String, clock: Arc<ServerClock>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            clock,
            retry_max_elapsed: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;
        let mut source =
            Self::with_clock(client, config.binance_api_url.clone(), Arc::new(ServerClock::new()));
        source.retry_max_elapsed = Duration::from_millis(config.retry_max_elapsed_ms);
        Ok(source)
    }

    pub fn clock(&self) -> Arc<ServerClock> {
        self.clock.clone()
    }

    /// Fetch exchange time and store the offset to the local clock.
    pub async fn sync_time(&self) -> Result<i64, DataSourceError> {
        let url = format!("{}/fapi/v1/time", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DataSourceError::HttpError {
                status: response.status().as_u16(),
                message: "time sync failed".to_string(),
            });
        }
        let body: ServerTime = response
            .json()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))?;

        let offset = self
            .clock
            .observe(TimeMs::new(body.server_time), TimeMs::now());
        info!(offset_ms = offset, "synchronized exchange clock");
        Ok(offset)
    }

    /// Signed GET with retry on network errors, rate limits and 5xx.
    ///
    /// The timestamp and signature are rebuilt on every attempt.
    async fn signed_get(
        &self,
        path: &str,
        params: &[(&str, String)],
        creds: &Credentials,
    ) -> Result<serde_json::Value, DataSourceError> {
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.retry_max_elapsed),
            ..Default::default()
        };

        retry(backoff, || async {
            let query = signed_query(params, self.clock.now(), creds.api_secret());
            let url = format!("{}{}?{}", self.base_url, path, query);

            let response = self
                .client
                .get(&url)
                .header("X-MBX-APIKEY", creds.api_key())
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_success() {
                return response.json::<serde_json::Value>().await.map_err(|e| {
                    backoff::Error::permanent(DataSourceError::ParseError(e.to_string()))
                });
            }

            let body = response.text().await.unwrap_or_default();
            let err = classify_error(status, &body);
            if status.is_server_error() {
                return Err(backoff::Error::transient(err));
            }
            if matches!(err, DataSourceError::Api { code: TIMESTAMP_OUT_OF_WINDOW, .. }) {
                warn!("request timestamp rejected, resynchronizing clock");
                if let Err(e) = self.sync_time().await {
                    warn!(error = %e, "clock resync failed");
                }
                return Err(backoff::Error::transient(err));
            }
            Err(backoff::Error::permanent(err))
        })
        .await
    }

    async fn signed_rows<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        creds: &Credentials,
    ) -> Result<Vec<T>, DataSourceError> {
        let response = self.signed_get(path, params, creds).await?;
        parse_rows(&response, path)
    }
}

fn classify_error(status: StatusCode, body: &str) -> DataSourceError {
    match serde_json::from_str::<ExchangeError>(body) {
        Ok(e) => DataSourceError::Api {
            status: status.as_u16(),
            code: e.code,
            msg: e.msg,
        },
        Err(_) => DataSourceError::HttpError {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                body.to_string()
            },
        },
    }
}

/// Decode an array response row by row, skipping rows that fail to parse.
fn parse_rows<T: DeserializeOwned>(
    response: &serde_json::Value,
    what: &str,
) -> Result<Vec<T>, DataSourceError> {
    let rows = response
        .as_array()
        .ok_or_else(|| DataSourceError::ParseError("Expected array response".to_string()))?;

    let mut parsed = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<T>(row.clone()) {
            Ok(item) => parsed.push(item),
            Err(e) => warn!("Failed to parse {} row: {}", what, e),
        }
    }
    Ok(parsed)
}

fn list_params(symbol: Option<&Symbol>, limit: u32) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(2);
    if let Some(symbol) = symbol {
        params.push(("symbol", symbol.as_str().to_string()));
    }
    params.push(("limit", limit.to_string()));
    params
}

#[async_trait]
impl DataSource for BinanceDataSource {
    async fn fetch_account(&self, creds: &Credentials) -> Result<AccountInfo, DataSourceError> {
        debug!("Fetching account info");
        let response = self.signed_get("/fapi/v2/account", &[], creds).await?;
        serde_json::from_value(response).map_err(|e| DataSourceError::ParseError(e.to_string()))
    }

    async fn fetch_positions(
        &self,
        creds: &Credentials,
    ) -> Result<Vec<PositionRisk>, DataSourceError> {
        debug!("Fetching position risk");
        let positions: Vec<PositionRisk> =
            self.signed_rows("/fapi/v2/positionRisk", &[], creds).await?;
        Ok(positions.into_iter().filter(PositionRisk::is_open).collect())
    }

    async fn fetch_trades(
        &self,
        creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Fill>, DataSourceError> {
        debug!(?symbol, limit, "Fetching user trades");
        self.signed_rows("/fapi/v1/userTrades", &list_params(symbol, limit), creds)
            .await
    }

    async fn fetch_orders(
        &self,
        creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Order>, DataSourceError> {
        debug!(?symbol, limit, "Fetching order history");
        self.signed_rows("/fapi/v1/allOrders", &list_params(symbol, limit), creds)
            .await
    }

    async fn fetch_income(
        &self,
        creds: &Credentials,
        limit: u32,
    ) -> Result<Vec<IncomeRecord>, DataSourceError> {
        debug!(limit, "Fetching income history");
        self.signed_rows("/fapi/v1/income", &list_params(None, limit), creds)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IncomeType;

    #[test]
    fn classify_error_reads_exchange_body() {
        let err = classify_error(
            StatusCode::UNAUTHORIZED,
            r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#,
        );
        assert_eq!(
            err,
            DataSourceError::Api {
                status: 401,
                code: -2015,
                msg: "Invalid API-key, IP, or permissions for action.".to_string(),
            }
        );
    }

    #[test]
    fn classify_error_falls_back_to_status() {
        let err = classify_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err,
            DataSourceError::HttpError {
                status: 502,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn parse_rows_skips_malformed_rows() {
        let response = serde_json::json!([
            {"incomeType": "FUNDING_FEE", "income": "-0.1", "asset": "USDT", "time": 1},
            {"incomeType": "FUNDING_FEE", "income": "not-a-number", "asset": "USDT", "time": 2}
        ]);
        let rows: Vec<IncomeRecord> = parse_rows(&response, "income").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income_type, IncomeType::FundingFee);
    }

    #[test]
    fn parse_rows_rejects_non_array() {
        let response = serde_json::json!({"code": -1000});
        let result: Result<Vec<IncomeRecord>, _> = parse_rows(&response, "income");
        assert!(matches!(result, Err(DataSourceError::ParseError(_))));
    }

    #[test]
    fn list_params_puts_symbol_first() {
        let symbol = Symbol::new("BTCUSDT");
        let params = list_params(Some(&symbol), 500);
        assert_eq!(
            params,
            vec![("symbol", "BTCUSDT".to_string()), ("limit", "500".to_string())]
        );
        assert_eq!(list_params(None, 50), vec![("limit", "50".to_string())]);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = BinanceDataSource::new("https://fapi.binance.com/".to_string());
        assert_eq!(source.base_url, DEFAULT_BASE_URL);
    }
}
