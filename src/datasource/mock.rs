//! Mock data source for testing without network calls.

use super::{Credentials, DataSource, DataSourceError};
use crate::domain::{AccountInfo, Decimal, Fill, IncomeRecord, Order, PositionRisk, Symbol};
use async_trait::async_trait;

/// Mock data source that returns predefined account data.
///
/// List endpoints mimic the exchange: optional symbol filter, then the most
/// recent `limit` rows in ascending time order.
#[derive(Debug, Clone)]
pub struct MockDataSource {
    account: AccountInfo,
    positions: Vec<PositionRisk>,
    fills: Vec<Fill>,
    orders: Vec<Order>,
    income: Vec<IncomeRecord>,
    failure: Option<DataSourceError>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self {
            account: AccountInfo {
                total_wallet_balance: Decimal::ZERO,
                available_balance: Decimal::ZERO,
                total_unrealized_profit: Decimal::ZERO,
                total_margin_balance: Decimal::ZERO,
                total_initial_margin: Decimal::ZERO,
                total_maint_margin: Decimal::ZERO,
                max_withdraw_amount: Decimal::ZERO,
            },
            positions: Vec::new(),
            fills: Vec::new(),
            orders: Vec::new(),
            income: Vec::new(),
            failure: None,
        }
    }

    pub fn with_account(mut self, account: AccountInfo) -> Self {
        self.account = account;
        self
    }

    /// Positions are stored as given; flat ones are dropped on fetch.
    pub fn with_positions(mut self, positions: Vec<PositionRisk>) -> Self {
        self.positions.extend(positions);
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fills.push(fill);
        self
    }

    pub fn with_fills(mut self, fills: Vec<Fill>) -> Self {
        self.fills.extend(fills);
        self
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders.extend(orders);
        self
    }

    pub fn with_income(mut self, income: Vec<IncomeRecord>) -> Self {
        self.income.extend(income);
        self
    }

    /// Make every call fail with `err`.
    pub fn failing(mut self, err: DataSourceError) -> Self {
        self.failure = Some(err);
        self
    }

    fn check(&self) -> Result<(), DataSourceError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

fn most_recent<T: Clone>(rows: Vec<T>, limit: u32) -> Vec<T> {
    let skip = rows.len().saturating_sub(limit as usize);
    rows.into_iter().skip(skip).collect()
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_account(&self, _creds: &Credentials) -> Result<AccountInfo, DataSourceError> {
        self.check()?;
        Ok(self.account.clone())
    }

    async fn fetch_positions(
        &self,
        _creds: &Credentials,
    ) -> Result<Vec<PositionRisk>, DataSourceError> {
        self.check()?;
        Ok(self.positions.iter().filter(|p| p.is_open()).cloned().collect())
    }

    async fn fetch_trades(
        &self,
        _creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Fill>, DataSourceError> {
        self.check()?;
        let mut rows: Vec<Fill> = self
            .fills
            .iter()
            .filter(|f| symbol.map_or(true, |s| &f.symbol == s))
            .cloned()
            .collect();
        rows.sort_by_key(|f| f.time);
        Ok(most_recent(rows, limit))
    }

    async fn fetch_orders(
        &self,
        _creds: &Credentials,
        symbol: Option<&Symbol>,
        limit: u32,
    ) -> Result<Vec<Order>, DataSourceError> {
        self.check()?;
        let mut rows: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| symbol.map_or(true, |s| &o.symbol == s))
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.time);
        Ok(most_recent(rows, limit))
    }

    async fn fetch_income(
        &self,
        _creds: &Credentials,
        limit: u32,
    ) -> Result<Vec<IncomeRecord>, DataSourceError> {
        self.check()?;
        let mut rows = self.income.clone();
        rows.sort_by_key(|r| r.time);
        Ok(most_recent(rows, limit))
    }
}
