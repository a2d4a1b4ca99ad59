//! Daily income buckets on a fixed UTC+8 calendar.
//!
//! Day boundaries fall at 16:00 UTC regardless of the server's local zone.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Decimal, IncomeRecord, IncomeType, TimeMs};

/// Offset of the dashboard calendar from UTC, in seconds.
pub const CALENDAR_UTC_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Number of daily buckets produced, ending with the current day.
pub const CALENDAR_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Σ REALIZED_PNL income.
    pub pnl: Decimal,
    /// Σ COMMISSION income, signed as in the ledger.
    pub commission: Decimal,
    /// Σ FUNDING_FEE income, signed as in the ledger.
    pub funding_fee: Decimal,
    /// Number of REALIZED_PNL records.
    pub trades: u32,
    /// `pnl + commission + funding_fee`.
    pub net_pnl: Decimal,
}

impl DailyBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            pnl: Decimal::ZERO,
            commission: Decimal::ZERO,
            funding_fee: Decimal::ZERO,
            trades: 0,
            net_pnl: Decimal::ZERO,
        }
    }

    fn record(&mut self, income: &IncomeRecord) {
        match income.income_type {
            IncomeType::RealizedPnl => {
                self.pnl += income.income;
                self.trades += 1;
            }
            IncomeType::Commission => self.commission += income.income,
            IncomeType::FundingFee => self.funding_fee += income.income,
            _ => return,
        }
        self.net_pnl = self.pnl + self.commission + self.funding_fee;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSummary {
    pub total_pnl: Decimal,
    pub total_commission: Decimal,
    pub total_funding_fee: Decimal,
    pub total_net: Decimal,
    /// Days with at least one REALIZED_PNL record.
    pub trade_days: usize,
    pub profit_days: usize,
    pub loss_days: usize,
    /// `profit_days / trade_days`, zero when there are no trade days.
    pub win_rate: Decimal,
}

fn calendar_offset() -> FixedOffset {
    FixedOffset::east_opt(CALENDAR_UTC_OFFSET_SECS).expect("UTC+8 is within FixedOffset range")
}

/// Calendar date of an instant in the dashboard's fixed offset.
pub fn calendar_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&calendar_offset()).date_naive()
}

fn record_date(time: TimeMs) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(time.as_ms()).map(calendar_date)
}

/// Bucket income records into the 30 calendar days ending on `as_of`'s date.
///
/// Always returns exactly [`CALENDAR_DAYS`] contiguous buckets, oldest first.
/// Records outside the window, of an unrelated income type, or with an
/// unrepresentable timestamp are ignored.
pub fn bucket_daily(records: &[IncomeRecord], as_of: DateTime<Utc>) -> Vec<DailyBucket> {
    let today = calendar_date(as_of);
    let first = today
        .checked_sub_days(Days::new(CALENDAR_DAYS as u64 - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut buckets: Vec<DailyBucket> = first
        .iter_days()
        .take(CALENDAR_DAYS)
        .map(DailyBucket::empty)
        .collect();

    let mut skipped = 0usize;
    for record in records {
        let Some(date) = record_date(record.time) else {
            skipped += 1;
            continue;
        };
        let index = (date - first).num_days();
        if !(0..CALENDAR_DAYS as i64).contains(&index) {
            continue;
        }
        buckets[index as usize].record(record);
    }

    if skipped > 0 {
        tracing::warn!(skipped, "ignored income records with invalid timestamps");
    }

    buckets
}

/// Totals and day counts over a set of buckets.
pub fn summarize_calendar(buckets: &[DailyBucket]) -> CalendarSummary {
    let total_pnl: Decimal = buckets.iter().map(|b| b.pnl).sum();
    let total_commission: Decimal = buckets.iter().map(|b| b.commission).sum();
    let total_funding_fee: Decimal = buckets.iter().map(|b| b.funding_fee).sum();
    let trade_days = buckets.iter().filter(|b| b.trades > 0).count();
    let profit_days = buckets.iter().filter(|b| b.net_pnl.is_positive()).count();
    let loss_days = buckets.iter().filter(|b| b.net_pnl.is_negative()).count();

    CalendarSummary {
        total_pnl,
        total_commission,
        total_funding_fee,
        total_net: total_pnl + total_commission + total_funding_fee,
        trade_days,
        profit_days,
        loss_days,
        win_rate: Decimal::from_count(profit_days).ratio_or_zero(Decimal::from_count(trade_days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn utc(y: i32, m: u32, day: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, day, h, min, 0).unwrap()
    }

    #[test]
    fn calendar_date_rolls_over_at_sixteen_utc() {
        assert_eq!(
            calendar_date(utc(2024, 1, 1, 15, 59)),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            calendar_date(utc(2024, 1, 1, 16, 0)),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn other_income_types_are_ignored() {
        let as_of = utc(2024, 3, 10, 12, 0);
        let t = TimeMs::new(as_of.timestamp_millis());
        let records = vec![
            IncomeRecord::new(IncomeType::Transfer, d("1000"), t),
            IncomeRecord::new(IncomeType::InsuranceClear, d("5"), t),
            IncomeRecord::new(IncomeType::Other, d("5"), t),
        ];

        let buckets = bucket_daily(&records, as_of);
        assert!(buckets.iter().all(|b| b.net_pnl.is_zero() && b.trades == 0));
    }

    #[test]
    fn invalid_timestamps_are_skipped() {
        let as_of = utc(2024, 3, 10, 12, 0);
        let records = vec![IncomeRecord::new(
            IncomeType::RealizedPnl,
            d("1"),
            TimeMs::new(i64::MAX),
        )];
        let buckets = bucket_daily(&records, as_of);
        assert_eq!(buckets.len(), CALENDAR_DAYS);
        assert!(buckets.iter().all(|b| b.trades == 0));
    }

    #[test]
    fn summary_counts_days() {
        let as_of = utc(2024, 3, 10, 12, 0);
        let day = |offset_days: i64| {
            TimeMs::new(as_of.timestamp_millis() - offset_days * TimeMs::MS_PER_DAY)
        };
        let records = vec![
            IncomeRecord::new(IncomeType::RealizedPnl, d("10"), day(0)),
            IncomeRecord::new(IncomeType::Commission, d("-1"), day(0)),
            IncomeRecord::new(IncomeType::RealizedPnl, d("-5"), day(1)),
            IncomeRecord::new(IncomeType::FundingFee, d("0.5"), day(2)),
        ];

        let buckets = bucket_daily(&records, as_of);
        let summary = summarize_calendar(&buckets);
        assert_eq!(summary.total_pnl, d("5"));
        assert_eq!(summary.total_commission, d("-1"));
        assert_eq!(summary.total_funding_fee, d("0.5"));
        assert_eq!(summary.total_net, d("4.5"));
        assert_eq!(summary.trade_days, 2);
        assert_eq!(summary.profit_days, 2);
        assert_eq!(summary.loss_days, 1);
        assert_eq!(summary.win_rate, d("1"));
    }

    #[test]
    fn summary_of_empty_calendar_has_zero_win_rate() {
        let buckets = bucket_daily(&[], utc(2024, 3, 10, 12, 0));
        let summary = summarize_calendar(&buckets);
        assert_eq!(summary.trade_days, 0);
        assert_eq!(summary.win_rate, Decimal::ZERO);
    }
}
