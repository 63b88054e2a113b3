//! Persistence for the `UserData` aggregate.
//!
//! The whole aggregate lives in one JSON file and every mutation is a full
//! read-modify-write of that file. Mutations are serialized twice over: an
//! in-process mutex orders threads sharing a `DataStore`, and an exclusive
//! lock on a sidecar `.lock` file orders separate processes. Readers take no
//! lock: writes land via temp file + rename, so a reader sees either the old
//! or the new aggregate, never a partial one.

use crate::{Config, CycleData, Error, PeriodDay, Result, SymptomLog, UserData};
use chrono::NaiveDate;
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// File name of the aggregate inside the data directory
pub const STORE_FILE_NAME: &str = "cycleguard_user_data.json";

/// Whether a mutation needs to be written back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Persist,
    Unchanged,
}

impl UserData {
    /// Load the aggregate from a file
    ///
    /// Never fails: a missing, unreadable or corrupt file yields the default
    /// aggregate, with a warning logged for anything other than "missing".
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No data file at {:?}, using default user data", path);
            return Self::default();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Failed to read data file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<UserData>(&contents) {
            Ok(data) => {
                tracing::debug!(
                    "Loaded user data from {:?} ({} period days, {} symptom logs)",
                    path,
                    data.period_days.len(),
                    data.symptom_logs.len()
                );
                data
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse data file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the aggregate to a file, replacing it atomically
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames
    /// it over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "data path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved user data to {:?}", path);
        Ok(())
    }
}

/// The single owner of the persisted `UserData` aggregate
///
/// Create one per process and hand it to callers (`&DataStore` or
/// `Arc<DataStore>`); it is `Send + Sync`.
#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl DataStore {
    /// Open the store backed by `path`, creating its directory if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opened data store at {:?}", path);
        Ok(Self {
            path,
            writer: Mutex::new(()),
        })
    }

    /// Open the store at its standard location inside the configured data dir
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.data.data_dir.join(STORE_FILE_NAME))
    }

    /// Path of the backing record
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Current aggregate, or the default one if nothing usable is stored
    pub fn get_user_data(&self) -> UserData {
        UserData::load(&self.path)
    }

    /// Replace the stored aggregate wholesale
    pub fn save_user_data(&self, data: &UserData) -> Result<()> {
        self.with_writer(|| self.write(data))
    }

    /// Overwrite the cycle configuration
    pub fn save_cycle_data(&self, cycle_data: CycleData) -> Result<()> {
        self.mutate("save_cycle_data", |data| {
            data.cycle_data = Some(cycle_data);
            Outcome::Persist
        })?;
        Ok(())
    }

    pub fn mark_onboarding_complete(&self) -> Result<()> {
        self.mutate("mark_onboarding_complete", |data| {
            data.has_completed_onboarding = true;
            Outcome::Persist
        })?;
        Ok(())
    }

    /// Log `date` as a period day; a date already logged is left alone and
    /// nothing is written
    pub fn add_period_day(&self, date: NaiveDate) -> Result<()> {
        self.mutate("add_period_day", |data| {
            if data.is_period_day(date) {
                Outcome::Unchanged
            } else {
                data.period_days.push(PeriodDay { date });
                Outcome::Persist
            }
        })?;
        Ok(())
    }

    /// Unlog `date`; the aggregate is written back even if it wasn't logged
    pub fn remove_period_day(&self, date: NaiveDate) -> Result<()> {
        self.mutate("remove_period_day", |data| {
            data.period_days.retain(|pd| pd.date != date);
            Outcome::Persist
        })?;
        Ok(())
    }

    /// Flip `date` between logged and unlogged, returning whether it is now
    /// logged
    pub fn toggle_period_day(&self, date: NaiveDate) -> Result<bool> {
        let data = self.mutate("toggle_period_day", |data| {
            if data.is_period_day(date) {
                data.period_days.retain(|pd| pd.date != date);
            } else {
                data.period_days.push(PeriodDay { date });
            }
            Outcome::Persist
        })?;
        Ok(data.is_period_day(date))
    }

    /// Insert or replace the symptom log for `log.date`
    pub fn save_symptom_log(&self, log: SymptomLog) -> Result<()> {
        self.mutate("save_symptom_log", |data| {
            match data.symptom_logs.iter().position(|sl| sl.date == log.date) {
                Some(i) => data.symptom_logs[i] = log,
                None => data.symptom_logs.push(log),
            }
            Outcome::Persist
        })?;
        Ok(())
    }

    /// Replace everything with the default aggregate
    pub fn reset_all_data(&self) -> Result<()> {
        self.with_writer(|| self.write(&UserData::default()))?;
        tracing::info!("Reset all user data at {:?}", self.path);
        Ok(())
    }

    /// Load, modify and (if needed) save the aggregate under the writer lock
    fn mutate<F>(&self, op: &str, f: F) -> Result<UserData>
    where
        F: FnOnce(&mut UserData) -> Outcome,
    {
        self.with_writer(|| {
            let mut data = UserData::load(&self.path);
            match f(&mut data) {
                Outcome::Persist => self.write(&data)?,
                Outcome::Unchanged => tracing::debug!("{}: nothing to write", op),
            }
            Ok(data)
        })
    }

    fn write(&self, data: &UserData) -> Result<()> {
        data.save(&self.path).map_err(|e| {
            tracing::error!("Error saving user data to {:?}: {}", self.path, e);
            e
        })
    }

    /// Run `f` holding both the in-process and the cross-process writer lock
    fn with_writer<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let _guard = self
            .writer
            .lock()
            .map_err(|_| Error::State("data store writer lock poisoned".into()))?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock_file.lock_exclusive()?;

        let result = f();

        // Lock is also released when the file is dropped
        let _ = lock_file.unlock();
        result
    }
}
