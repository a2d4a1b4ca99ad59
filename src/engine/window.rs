//! Look-back window filter for dashboard time ranges.

use crate::domain::{Fill, IncomeRecord, Order, TimeMs};

/// Records that carry an event time.
pub trait Timestamped {
    fn timestamp(&self) -> TimeMs;
}

impl Timestamped for Fill {
    fn timestamp(&self) -> TimeMs {
        self.time
    }
}

impl Timestamped for IncomeRecord {
    fn timestamp(&self) -> TimeMs {
        self.time
    }
}

impl Timestamped for Order {
    fn timestamp(&self) -> TimeMs {
        self.time
    }
}

/// Keep items no older than `days` days before `now`. `days == 0` keeps all.
pub fn within_days<T: Timestamped>(items: Vec<T>, days: u32, now: TimeMs) -> Vec<T> {
    if days == 0 {
        return items;
    }
    let cutoff = now.saturating_sub_ms(i64::from(days) * TimeMs::MS_PER_DAY);
    items
        .into_iter()
        .filter(|item| item.timestamp() >= cutoff)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, IncomeType};

    fn income_at(ms: i64) -> IncomeRecord {
        IncomeRecord::new(IncomeType::RealizedPnl, Decimal::ONE, TimeMs::new(ms))
    }

    #[test]
    fn zero_days_keeps_everything() {
        let items = vec![income_at(0), income_at(1)];
        assert_eq!(within_days(items, 0, TimeMs::new(10 * TimeMs::MS_PER_DAY)).len(), 2);
    }

    #[test]
    fn cutoff_is_inclusive() {
        let now = TimeMs::new(10 * TimeMs::MS_PER_DAY);
        let items = vec![
            income_at(3 * TimeMs::MS_PER_DAY - 1),
            income_at(3 * TimeMs::MS_PER_DAY),
            income_at(9 * TimeMs::MS_PER_DAY),
        ];
        let kept = within_days(items, 7, now);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].time, TimeMs::new(3 * TimeMs::MS_PER_DAY));
    }
}
