#![forbid(unsafe_code)]

//! Core data engine for CycleGuard.
//!
//! This crate provides:
//! - Domain types (cycle configuration, period days, symptom logs)
//! - The single-record data store
//! - Cycle prediction (next period, period and fertile windows)
//! - Calendar month grids
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod predictor;
pub mod calendar;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::DataStore;
pub use predictor::{
    calculate_next_period, fertile_window_dates, format_date, format_long_date,
    format_month_year, predicted_dates_for_month, predicted_period_dates, MonthPredictions,
};
pub use calendar::{shift_month, CalendarDay, MonthGrid};
pub use export::{export_to_csv, generate_csv};
