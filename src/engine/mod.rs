//! Pure computation over fetched account data.
//!
//! Nothing here performs I/O or keeps state between calls.

use crate::domain::{Decimal, Fill, Side, Symbol, TimeMs};
use serde::Serialize;

pub mod aggregator;
pub mod calendar;
pub mod stats;
pub mod window;

pub use aggregator::{aggregate, LifecycleAggregator, COMPLETION_TOLERANCE};
pub use calendar::{bucket_daily, summarize_calendar, CalendarSummary, DailyBucket};
pub use stats::{summarize, AccountStats, SymbolStats};
pub use window::{within_days, Timestamped};

/// A reconstructed open-to-close trading episode for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub symbol: Symbol,
    pub start_time: TimeMs,
    pub end_time: TimeMs,
    /// Side of the first opening fill. `None` when the episode has no opens.
    pub side: Option<Side>,
    pub open_trades: Vec<Fill>,
    pub close_trades: Vec<Fill>,
    pub open_count: usize,
    pub close_count: usize,
    /// `None` when there are no opening fills.
    pub avg_open_price: Option<Decimal>,
    /// `None` when there are no closing fills yet.
    pub avg_close_price: Option<Decimal>,
    /// Σ|qty| over opening fills.
    pub total_qty: Decimal,
    /// Σ commission over opening and closing fills.
    pub total_commission: Decimal,
    /// Σ realized P&L over closing fills.
    pub realized_pnl: Decimal,
    /// `end_time - start_time` in milliseconds.
    pub duration: i64,
    /// Flushed at end of input with open quantity not yet offset.
    pub is_partial: bool,
}

impl Lifecycle {
    pub fn is_profit(&self) -> bool {
        self.realized_pnl.is_positive()
    }

    pub fn is_loss(&self) -> bool {
        self.realized_pnl.is_negative()
    }

    /// Realized P&L after commission.
    pub fn net_pnl(&self) -> Decimal {
        self.realized_pnl - self.total_commission
    }
}
