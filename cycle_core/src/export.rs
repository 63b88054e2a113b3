//! CSV export of logged history.
//!
//! One row per distinct date found in either the period days or the symptom
//! logs, sorted by date:
//!
//! ```text
//! date,is_period_day,symptoms,notes
//! 2025-03-01,Yes,cramps,"mild, ok"
//! ```

use crate::{Error, Result, UserData};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    is_period_day: &'static str,
    symptoms: String,
    notes: String,
}

#[derive(Debug, Default)]
struct DayEntry {
    is_period_day: bool,
    symptoms: String,
    notes: String,
}

/// File name used for an export made on `today`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("cycleguard_export_{}.csv", today)
}

/// Render the export document
///
/// Fields containing a comma, quote or line break are quoted with inner
/// quotes doubled. Every record, the last included, ends in `\n`.
pub fn generate_csv(data: &UserData) -> Result<String> {
    let mut by_date: BTreeMap<NaiveDate, DayEntry> = BTreeMap::new();

    for pd in &data.period_days {
        by_date.entry(pd.date).or_default().is_period_day = true;
    }
    for log in &data.symptom_logs {
        let entry = by_date.entry(log.date).or_default();
        entry.symptoms = log.symptoms.join("; ");
        entry.notes = log.notes.clone();
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if by_date.is_empty() {
        writer.write_record(["date", "is_period_day", "symptoms", "notes"])?;
    }

    for (date, entry) in by_date {
        writer.serialize(CsvRow {
            date: date.to_string(),
            is_period_day: if entry.is_period_day { "Yes" } else { "No" },
            symptoms: entry.symptoms,
            notes: entry.notes,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV output not UTF-8: {}", e)))
}

/// Write the export for `data` into `dir` and return the file's path
///
/// Fails with [`Error::NothingToExport`] when there are no period days and
/// no symptom logs; callers should report that differently from a real
/// failure.
pub fn export_to_csv(data: &UserData, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
    if data.has_no_history() {
        tracing::info!("Nothing to export");
        return Err(Error::NothingToExport);
    }

    let contents = generate_csv(data)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(today));

    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    tracing::info!(
        "Exported {} period days and {} symptom logs to {:?}",
        data.period_days.len(),
        data.symptom_logs.len(),
        path
    );

    Ok(path)
}
