//! Core domain types for CycleGuard.
//!
//! This module defines the persisted data model:
//! - Cycle configuration (last period start, period and cycle lengths)
//! - Logged period days and symptom logs
//! - The `UserData` aggregate that is stored as a single record
//!
//! Field names serialize in camelCase so the record layout matches the
//! format existing installs already have on disk.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period length used when setup leaves it blank
pub const DEFAULT_PERIOD_LENGTH: i32 = 5;

/// Cycle length used when setup leaves it blank
pub const DEFAULT_CYCLE_LENGTH: i32 = 28;

// ============================================================================
// Cycle Configuration
// ============================================================================

/// The user's self-reported baseline cycle
///
/// Lengths are deliberately signed and unchecked here; see [`CycleData::validate`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleData {
    #[serde(with = "day_or_timestamp")]
    pub last_period_start: NaiveDate,
    pub period_length: i32,
    pub cycle_length: i32,
}

impl CycleData {
    pub fn new(last_period_start: NaiveDate, period_length: i32, cycle_length: i32) -> Self {
        Self {
            last_period_start,
            period_length,
            cycle_length,
        }
    }

    /// Check `period_length >= 1` and `cycle_length >= period_length`
    ///
    /// The store and predictor accept any values; this is for input
    /// boundaries that want to reject nonsense before it is saved.
    pub fn validate(&self) -> Result<()> {
        if self.period_length < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "period length must be at least 1 day, got {}",
                self.period_length
            )));
        }
        if self.cycle_length < self.period_length {
            return Err(Error::InvalidConfiguration(format!(
                "cycle length ({}) must not be shorter than period length ({})",
                self.cycle_length, self.period_length
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Logged Days
// ============================================================================

/// A day the user explicitly logged as a period day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodDay {
    pub date: NaiveDate,
}

/// Symptoms and notes for one calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

// ============================================================================
// Aggregate
// ============================================================================

/// Everything persisted for a user, stored and rewritten as one record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_data: Option<CycleData>,
    #[serde(default)]
    pub period_days: Vec<PeriodDay>,
    #[serde(default)]
    pub symptom_logs: Vec<SymptomLog>,
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

impl UserData {
    /// Whether `date` is logged as a period day
    pub fn is_period_day(&self, date: NaiveDate) -> bool {
        self.period_days.iter().any(|pd| pd.date == date)
    }

    /// The symptom log for `date`, if any
    pub fn symptom_log(&self, date: NaiveDate) -> Option<&SymptomLog> {
        self.symptom_logs.iter().find(|log| log.date == date)
    }

    /// Logged period days as plain dates, in insertion order
    pub fn logged_period_dates(&self) -> Vec<NaiveDate> {
        self.period_days.iter().map(|pd| pd.date).collect()
    }

    /// True when there is nothing a CSV export could contain
    pub fn has_no_history(&self) -> bool {
        self.period_days.is_empty() && self.symptom_logs.is_empty()
    }
}

/// Parse a canonical `YYYY-MM-DD` day string
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidDate(format!("{:?}: {}", s, e)))
}

/// Serde adapter for `lastPeriodStart`.
///
/// Writes `YYYY-MM-DD`. Reads either that or an RFC 3339 timestamp, which
/// older records stored; the timestamp's UTC calendar day is kept.
mod day_or_timestamp {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(date)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|_| de::Error::custom(format!("invalid date {:?}", raw)))
    }
}
