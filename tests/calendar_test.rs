use chrono::{NaiveDate, TimeZone, Utc};
use futures_dashboard::engine::calendar::CALENDAR_DAYS;
use futures_dashboard::{bucket_daily, summarize_calendar, Decimal, IncomeRecord, IncomeType, TimeMs};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn ms(y: i32, m: u32, day: u32, h: u32, min: u32, s: u32) -> TimeMs {
    TimeMs::new(
        Utc.with_ymd_and_hms(y, m, day, h, min, s)
            .unwrap()
            .timestamp_millis(),
    )
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_always_thirty_contiguous_days() {
    for as_of in [
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 15, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 16, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap(),
    ] {
        let buckets = bucket_daily(&[], as_of);
        assert_eq!(buckets.len(), CALENDAR_DAYS);
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
        assert!(buckets.iter().all(|b| b.trades == 0 && b.net_pnl.is_zero()));
    }
}

#[test]
fn test_window_ends_on_utc8_today() {
    // 20:00 UTC on Feb 29 is already Mar 1 in UTC+8.
    let as_of = Utc.with_ymd_and_hms(2024, 2, 29, 20, 0, 0).unwrap();
    let buckets = bucket_daily(&[], as_of);
    assert_eq!(buckets.last().unwrap().date, date(2024, 3, 1));
    assert_eq!(buckets.first().unwrap().date, date(2024, 2, 1));
}

#[test]
fn test_record_on_day_boundary_goes_to_later_day() {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let boundary = ms(2024, 1, 1, 16, 0, 0);
    let records = vec![
        IncomeRecord::new(IncomeType::RealizedPnl, d("10"), boundary),
        IncomeRecord::new(
            IncomeType::RealizedPnl,
            d("5"),
            TimeMs::new(boundary.as_ms() - 1),
        ),
    ];

    let buckets = bucket_daily(&records, as_of);
    let jan1 = buckets.iter().find(|b| b.date == date(2024, 1, 1)).unwrap();
    let jan2 = buckets.iter().find(|b| b.date == date(2024, 1, 2)).unwrap();
    assert_eq!(jan1.pnl, d("5"));
    assert_eq!(jan2.pnl, d("10"));
    assert_eq!(jan1.trades, 1);
    assert_eq!(jan2.trades, 1);
}

#[test]
fn test_signed_fees_are_added_not_negated() {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let t = ms(2024, 1, 10, 1, 0, 0);
    let records = vec![
        IncomeRecord::new(IncomeType::RealizedPnl, d("100"), t),
        IncomeRecord::new(IncomeType::Commission, d("-4"), t),
        IncomeRecord::new(IncomeType::FundingFee, d("-1.5"), t),
        IncomeRecord::new(IncomeType::FundingFee, d("0.5"), t),
        IncomeRecord::new(IncomeType::Transfer, d("1000"), t),
    ];

    let buckets = bucket_daily(&records, as_of);
    let today = buckets.last().unwrap();
    assert_eq!(today.pnl, d("100"));
    assert_eq!(today.commission, d("-4"));
    assert_eq!(today.funding_fee, d("-1"));
    assert_eq!(today.trades, 1);
    assert_eq!(today.net_pnl, d("95"));
}

#[test]
fn test_records_outside_window_are_ignored() {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
    let records = vec![
        IncomeRecord::new(IncomeType::RealizedPnl, d("1"), ms(2023, 12, 1, 0, 0, 0)),
        IncomeRecord::new(IncomeType::RealizedPnl, d("1"), ms(2024, 2, 5, 0, 0, 0)),
    ];
    let buckets = bucket_daily(&records, as_of);
    assert!(buckets.iter().all(|b| b.trades == 0));
}

#[test]
fn test_summary_counts_days() {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let records = vec![
        IncomeRecord::new(IncomeType::RealizedPnl, d("20"), ms(2024, 1, 8, 2, 0, 0)),
        IncomeRecord::new(IncomeType::Commission, d("-1"), ms(2024, 1, 8, 2, 0, 0)),
        IncomeRecord::new(IncomeType::RealizedPnl, d("-30"), ms(2024, 1, 9, 2, 0, 0)),
        IncomeRecord::new(IncomeType::RealizedPnl, d("5"), ms(2024, 1, 10, 2, 0, 0)),
        // Funding only: a profit day without trades.
        IncomeRecord::new(IncomeType::FundingFee, d("0.3"), ms(2024, 1, 7, 2, 0, 0)),
    ];

    let summary = summarize_calendar(&bucket_daily(&records, as_of));
    assert_eq!(summary.trade_days, 3);
    assert_eq!(summary.profit_days, 3);
    assert_eq!(summary.loss_days, 1);
    assert_eq!(summary.win_rate, d("1"));
    assert_eq!(summary.total_pnl, d("-5"));
    assert_eq!(summary.total_net, d("-5.7"));
}

#[test]
fn test_summary_of_empty_month() {
    let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let summary = summarize_calendar(&bucket_daily(&[], as_of));
    assert_eq!(summary.trade_days, 0);
    assert_eq!(summary.win_rate, Decimal::zero());
    assert_eq!(summary.total_net, Decimal::zero());
}
