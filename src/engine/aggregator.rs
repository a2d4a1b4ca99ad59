use std::collections::HashMap;

use crate::domain::{is_time_sorted, sort_fills_by_time, Decimal, Fill, Symbol, TimeMs};

use super::Lifecycle;

/// Fraction of the opened quantity that must be closed before an episode is
/// considered finished. Absorbs rounding in exchange-reported quantities.
pub const COMPLETION_TOLERANCE: Decimal = Decimal::from_parts(99, 2);

/// Fills accumulated for one symbol since its last completed episode.
#[derive(Debug, Clone)]
struct Group {
    symbol: Symbol,
    /// Creation order among groups, used to order end-of-input flushes.
    seq: u64,
    open_trades: Vec<Fill>,
    close_trades: Vec<Fill>,
    start_time: TimeMs,
    end_time: TimeMs,
}

impl Group {
    fn new(fill: &Fill, seq: u64) -> Self {
        Self {
            symbol: fill.symbol.clone(),
            seq,
            open_trades: Vec::new(),
            close_trades: Vec::new(),
            start_time: fill.time,
            end_time: fill.time,
        }
    }

    fn push(&mut self, fill: &Fill) {
        if fill.is_closing() {
            self.close_trades.push(fill.clone());
            self.end_time = fill.time;
        } else {
            self.open_trades.push(fill.clone());
            if self.open_trades.len() == 1 {
                self.start_time = fill.time;
            }
        }
    }

    fn open_qty(&self) -> Decimal {
        self.open_trades.iter().map(Fill::abs_qty).sum()
    }

    fn close_qty(&self) -> Decimal {
        self.close_trades.iter().map(Fill::abs_qty).sum()
    }

    fn is_complete(&self) -> bool {
        if self.open_trades.is_empty() || self.close_trades.is_empty() {
            return false;
        }
        self.close_qty() >= self.open_qty() * COMPLETION_TOLERANCE
    }

    fn into_lifecycle(self, is_partial: bool) -> Lifecycle {
        let total_qty = self.open_qty();
        let close_qty = self.close_qty();
        let avg_open_price = weighted_avg_price(&self.open_trades, total_qty);
        let avg_close_price = weighted_avg_price(&self.close_trades, close_qty);

        let total_commission = self
            .open_trades
            .iter()
            .chain(self.close_trades.iter())
            .map(|f| f.commission)
            .sum();
        let realized_pnl = self.close_trades.iter().map(|f| f.realized_pnl).sum();

        Lifecycle {
            symbol: self.symbol,
            start_time: self.start_time,
            end_time: self.end_time,
            side: self.open_trades.first().map(|f| f.side),
            open_count: self.open_trades.len(),
            close_count: self.close_trades.len(),
            avg_open_price,
            avg_close_price,
            total_qty,
            total_commission,
            realized_pnl,
            duration: self.end_time.since(self.start_time),
            is_partial,
            open_trades: self.open_trades,
            close_trades: self.close_trades,
        }
    }
}

/// Σ(price·|qty|) / Σ|qty|, or `None` for an empty leg.
fn weighted_avg_price(fills: &[Fill], total_qty: Decimal) -> Option<Decimal> {
    if fills.is_empty() {
        return None;
    }
    let notional: Decimal = fills.iter().map(Fill::notional).sum();
    notional.checked_div(total_qty)
}

/// Streaming reconstruction of trading episodes from time-ordered fills.
///
/// Each symbol has at most one live group. Opening fills accumulate into it
/// until cumulative closed quantity reaches [`COMPLETION_TOLERANCE`] of the
/// opened quantity, at which point the group is emitted and dropped. This is
/// not lot matching: scale-ins and scale-outs within one run are merged.
pub struct LifecycleAggregator {
    live: HashMap<Symbol, Group>,
    completed: Vec<Lifecycle>,
    next_seq: u64,
}

impl LifecycleAggregator {
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
            completed: Vec::new(),
            next_seq: 0,
        }
    }

    /// Assign one fill to its symbol's live group.
    ///
    /// Callers must feed fills in non-decreasing time order.
    pub fn process_fill(&mut self, fill: &Fill) {
        let seq = self.next_seq;
        let group = self.live.entry(fill.symbol.clone()).or_insert_with(|| {
            tracing::trace!(symbol = %fill.symbol, "starting lifecycle group");
            Group::new(fill, seq)
        });
        if group.seq == seq {
            self.next_seq += 1;
        }

        group.push(fill);

        if group.is_complete() {
            if let Some(group) = self.live.remove(&fill.symbol) {
                self.completed.push(group.into_lifecycle(false));
            }
        }
    }

    /// Number of symbols with an unfinished group.
    pub fn live_groups(&self) -> usize {
        self.live.len()
    }

    /// Flush unfinished groups as partial and return every lifecycle, most
    /// recent `end_time` first.
    pub fn finish(self) -> Vec<Lifecycle> {
        let mut lifecycles = self.completed;

        let mut remaining: Vec<Group> = self.live.into_values().collect();
        remaining.sort_by_key(|g| g.seq);
        lifecycles.extend(remaining.into_iter().map(|g| g.into_lifecycle(true)));

        lifecycles.sort_by(|a, b| b.end_time.cmp(&a.end_time));
        lifecycles
    }
}

impl Default for LifecycleAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Group `fills` into lifecycles.
///
/// Input order does not matter beyond ties: fills are stably sorted by time
/// first. The input slice is not modified.
pub fn aggregate(fills: &[Fill]) -> Vec<Lifecycle> {
    let mut sorted = fills.to_vec();
    sort_fills_by_time(&mut sorted);
    debug_assert!(is_time_sorted(&sorted));

    let mut aggregator = LifecycleAggregator::new();
    for fill in &sorted {
        aggregator.process_fill(fill);
    }

    let lifecycles = aggregator.finish();
    tracing::debug!(
        fills = fills.len(),
        lifecycles = lifecycles.len(),
        partial = lifecycles.iter().filter(|l| l.is_partial).count(),
        "aggregated fills"
    );
    lifecycles
}
