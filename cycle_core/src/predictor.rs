//! Cycle prediction from a fixed recurring interval.
//!
//! Everything here is pure date arithmetic over [`CycleData`]:
//! - Next period start = last start + cycle length
//! - Period window = `period_length` days from a start date
//! - Fertile window = 6 days ending at ovulation, `cycle_length - 14` days
//!   after a period start
//!
//! Inputs are not validated. Odd lengths give odd but well-defined dates.

use crate::CycleData;
use chrono::{Datelike, Duration, NaiveDate};

/// Days between ovulation and the following period
const LUTEAL_PHASE_DAYS: i64 = 14;

/// Days before ovulation that still count as fertile
const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;

/// Predicted dates falling inside one calendar month
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthPredictions {
    pub period_dates: Vec<NaiveDate>,
    pub fertile_dates: Vec<NaiveDate>,
}

/// Shift `date` by `days`, saturating at chrono's representable range
fn offset(date: NaiveDate, days: i64) -> NaiveDate {
    match date.checked_add_signed(Duration::days(days)) {
        Some(d) => d,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

/// Predicted start of the next period
pub fn calculate_next_period(cycle: &CycleData) -> NaiveDate {
    offset(cycle.last_period_start, i64::from(cycle.cycle_length))
}

/// The `period_length` consecutive days beginning at `start`
pub fn predicted_period_dates(cycle: &CycleData, start: NaiveDate) -> Vec<NaiveDate> {
    (0..i64::from(cycle.period_length.max(0)))
        .map(|i| offset(start, i))
        .collect()
}

/// Fertile window for the cycle starting at `period_start`
///
/// Always six days: five before ovulation plus ovulation day itself. The
/// window may land before `period_start` when the cycle is short.
pub fn fertile_window_dates(cycle: &CycleData, period_start: NaiveDate) -> Vec<NaiveDate> {
    let ovulation_day = i64::from(cycle.cycle_length) - LUTEAL_PHASE_DAYS;
    let fertile_start = ovulation_day - FERTILE_DAYS_BEFORE_OVULATION;

    (fertile_start..=ovulation_day)
        .map(|i| offset(period_start, i))
        .collect()
}

/// Predicted period and fertile dates for `month` (1-12) of `year`
///
/// Only the last logged cycle and the next predicted one are considered, so
/// months further than one cycle from `last_period_start` come back empty.
pub fn predicted_dates_for_month(cycle: &CycleData, year: i32, month: u32) -> MonthPredictions {
    let anchors = [cycle.last_period_start, calculate_next_period(cycle)];
    let in_month = |d: &NaiveDate| d.year() == year && d.month() == month;

    let mut predictions = MonthPredictions::default();
    for anchor in anchors {
        for date in predicted_period_dates(cycle, anchor).into_iter().filter(in_month) {
            push_unique(&mut predictions.period_dates, date);
        }
        for date in fertile_window_dates(cycle, anchor).into_iter().filter(in_month) {
            push_unique(&mut predictions.fertile_dates, date);
        }
    }

    tracing::debug!(
        "Predicted {} period and {} fertile dates for {}-{:02}",
        predictions.period_dates.len(),
        predictions.fertile_dates.len(),
        year,
        month
    );

    predictions
}

// Windows from the two anchors only overlap when period_length > cycle_length.
fn push_unique(dates: &mut Vec<NaiveDate>, date: NaiveDate) {
    if !dates.contains(&date) {
        dates.push(date);
    }
}

/// Short display form, e.g. `Mar 5`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Setup-screen display form, e.g. `Mar 5, 2025`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Calendar header, e.g. `March 2025`. Empty for an invalid month.
pub fn format_month_year(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default()
}
