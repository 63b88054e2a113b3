//! Month grid for calendar rendering.
//!
//! Joins the predictor's output with logged period days and today's date so
//! a renderer only has to draw cells. Weeks start on Sunday.

use crate::predictor::{format_month_year, predicted_dates_for_month, MonthPredictions};
use crate::UserData;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// One day cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_predicted_period: bool,
    pub is_fertile: bool,
    pub is_logged_period: bool,
}

/// A full month ready to render
#[derive(Clone, Debug)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub title: String,
    /// Empty cells before the 1st (Sunday = 0)
    pub leading_blanks: usize,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    /// Build the grid for `month` (1-12) of `year`; `None` if the month is invalid
    pub fn build(data: &UserData, year: i32, month: u32, today: NaiveDate) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days_in_month = shift_month(year, month, 1)
            .and_then(|(next_year, next_month)| NaiveDate::from_ymd_opt(next_year, next_month, 1))
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(31);

        let predictions = data
            .cycle_data
            .as_ref()
            .map(|cycle| predicted_dates_for_month(cycle, year, month))
            .unwrap_or_default();
        let MonthPredictions {
            period_dates,
            fertile_dates,
        } = predictions;
        let period: HashSet<NaiveDate> = period_dates.into_iter().collect();
        let fertile: HashSet<NaiveDate> = fertile_dates.into_iter().collect();
        let logged: HashSet<NaiveDate> = data.logged_period_dates().into_iter().collect();

        let days = first
            .iter_days()
            .take(days_in_month as usize)
            .map(|date| CalendarDay {
                day: date.day(),
                date,
                is_today: date == today,
                is_predicted_period: period.contains(&date),
                is_fertile: fertile.contains(&date),
                is_logged_period: logged.contains(&date),
            })
            .collect();

        Some(Self {
            year,
            month,
            title: format_month_year(year, month),
            leading_blanks: first.weekday().num_days_from_sunday() as usize,
            days,
        })
    }

    /// Rows of seven cells, padded with `None` before the 1st and after the last day
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay>>> {
        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.leading_blanks];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// Move `delta` months from `(year, month)`, wrapping across years
///
/// `None` if `month` is not 1-12 or the result does not fit in an `i32` year.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}
