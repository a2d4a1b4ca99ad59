//! Account and per-symbol rollups over lifecycles.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Decimal, Symbol};

use super::Lifecycle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolStats {
    pub symbol: Symbol,
    pub pnl: Decimal,
    pub commission: Decimal,
    /// `pnl - commission`.
    pub net_profit: Decimal,
    pub trades: usize,
    pub profit: usize,
    pub loss: usize,
    /// `profit / trades`, zero when there are no trades.
    pub win_rate: Decimal,
}

impl SymbolStats {
    fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            pnl: Decimal::ZERO,
            commission: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            trades: 0,
            profit: 0,
            loss: 0,
            win_rate: Decimal::ZERO,
        }
    }

    fn record(&mut self, lifecycle: &Lifecycle) {
        self.pnl += lifecycle.realized_pnl;
        self.commission += lifecycle.total_commission;
        self.trades += 1;
        if lifecycle.is_profit() {
            self.profit += 1;
        } else if lifecycle.is_loss() {
            self.loss += 1;
        }
    }

    fn finalize(&mut self) {
        self.net_profit = self.pnl - self.commission;
        self.win_rate = win_rate(self.profit, self.trades);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_commission: Decimal,
    pub total_pnl: Decimal,
    /// `total_pnl - total_commission`. Commission is stored as a positive
    /// magnitude and is subtracted here.
    pub net_profit: Decimal,
    pub total_open_count: usize,
    pub total_close_count: usize,
    pub total_trades: usize,
    pub profit_trades: usize,
    pub loss_trades: usize,
    pub win_rate: Decimal,
    /// Sorted by `pnl` descending.
    pub by_symbol: Vec<SymbolStats>,
}

fn win_rate(wins: usize, total: usize) -> Decimal {
    Decimal::from_count(wins).ratio_or_zero(Decimal::from_count(total))
}

/// Roll lifecycles up into account totals and a per-symbol breakdown.
///
/// Zero-P&L lifecycles count toward `total_trades` but are neither profit nor
/// loss trades.
pub fn summarize(lifecycles: &[Lifecycle]) -> AccountStats {
    let mut total_commission = Decimal::ZERO;
    let mut total_pnl = Decimal::ZERO;
    let mut total_open_count = 0;
    let mut total_close_count = 0;
    let mut profit_trades = 0;
    let mut loss_trades = 0;
    let mut by_symbol: HashMap<Symbol, SymbolStats> = HashMap::new();

    for lifecycle in lifecycles {
        total_commission += lifecycle.total_commission;
        total_pnl += lifecycle.realized_pnl;
        total_open_count += lifecycle.open_count;
        total_close_count += lifecycle.close_count;
        if lifecycle.is_profit() {
            profit_trades += 1;
        } else if lifecycle.is_loss() {
            loss_trades += 1;
        }

        by_symbol
            .entry(lifecycle.symbol.clone())
            .or_insert_with(|| SymbolStats::empty(lifecycle.symbol.clone()))
            .record(lifecycle);
    }

    let mut by_symbol: Vec<SymbolStats> = by_symbol
        .into_values()
        .map(|mut s| {
            s.finalize();
            s
        })
        .collect();
    by_symbol.sort_by(|a, b| {
        b.pnl
            .cmp(&a.pnl)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let total_trades = lifecycles.len();
    AccountStats {
        total_commission,
        total_pnl,
        net_profit: total_pnl - total_commission,
        total_open_count,
        total_close_count,
        total_trades,
        profit_trades,
        loss_trades,
        win_rate: win_rate(profit_trades, total_trades),
        by_symbol,
    }
}
