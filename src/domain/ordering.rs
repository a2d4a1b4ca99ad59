//! Time ordering of fills.

use crate::domain::Fill;

/// Sort fills ascending by execution time.
///
/// Fills sharing a timestamp keep their input order. That order decides which
/// of two same-millisecond fills is seen first, and so which group a closing
/// fill lands in.
pub fn sort_fills_by_time(fills: &mut [Fill]) {
    fills.sort_by_key(|f| f.time);
}

/// True when `fills` is already non-decreasing in time.
pub fn is_time_sorted(fills: &[Fill]) -> bool {
    fills.windows(2).all(|w| w[0].time <= w[1].time)
}
