use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Days an inspection can be booked on: from `today + lead_days` through
/// the last day of next month, Sundays excluded.
pub fn available_dates(today: NaiveDate, lead_days: u32) -> Vec<NaiveDate> {
    let first = today + Duration::days(i64::from(lead_days));
    let last = last_day_of_next_month(today);

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .filter(|day| day.weekday() != Weekday::Sun)
        .collect()
}

fn last_day_of_next_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = match today.month() {
        11 => (today.year() + 1, 1),
        12 => (today.year() + 1, 2),
        m => (today.year(), m + 2),
    };
    // First day of the month after next, minus one day
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
