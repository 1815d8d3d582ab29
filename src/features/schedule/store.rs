//! # Schedule Store
//!
//! Owns the per-user schedule map and its JSON settings file. All command
//! mutations flow through here; the enforcement sweep only takes read
//! snapshots. Every mutation persists synchronously (temp file + rename)
//! before the write lock is released, so one command can never observe
//! another's half-applied record.
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.1.0: Atomic settings writes via sibling temp file
//! - 2.0.0: Injected store with explicit load/save lifecycle, no globals
//! - 1.0.0: Initial creation

use crate::core::ScheduleError;
use crate::features::schedule::record::{
    ScheduleRecord, TimeOfDay, TimeWindow, MAX_OFFSET_MINUTES, MINUTES_PER_DAY,
};
use chrono::{DateTime, Timelike, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Thread-safe schedule storage backed by a JSON settings file.
///
/// Cheap to share as `Arc<ScheduleStore>`; the command surface and the
/// enforcement sweep hold the same instance.
#[derive(Debug)]
pub struct ScheduleStore {
    path: PathBuf,
    records: RwLock<HashMap<String, ScheduleRecord>>,
}

impl ScheduleStore {
    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store. A present but unparseable file
    /// fails with [`ScheduleError::LoadCorruption`] so startup can refuse to
    /// run (and later overwrite the file) until an operator intervenes.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref().to_path_buf();

        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<HashMap<String, ScheduleRecord>>(&contents)
                .map_err(|source| ScheduleError::LoadCorruption {
                    path: path.display().to_string(),
                    source,
                })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No settings file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(source) => {
                return Err(ScheduleError::PersistenceFailure {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(ScheduleStore {
            path,
            records: RwLock::new(records),
        })
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// One user's record, if any.
    pub async fn get(&self, user_id: &str) -> Option<ScheduleRecord> {
        self.records.read().await.get(user_id).cloned()
    }

    /// Copy of the full map for one enforcement tick. Taken once per tick so
    /// a command landing mid-tick cannot make the tick's decisions
    /// inconsistent with each other.
    pub async fn snapshot(&self) -> HashMap<String, ScheduleRecord> {
        self.records.read().await.clone()
    }

    /// Set the once-daily disconnect moment, creating the record if needed.
    pub async fn set_exact_moment(
        &self,
        user_id: &str,
        moment: TimeOfDay,
    ) -> Result<(), ScheduleError> {
        let mut records = self.records.write().await;
        records.entry(user_id.to_string()).or_default().exact_moment = Some(moment);
        self.persist(&records)
    }

    /// Set the recurring disconnect window, creating the record if needed.
    pub async fn set_window(
        &self,
        user_id: &str,
        window: TimeWindow,
    ) -> Result<(), ScheduleError> {
        let mut records = self.records.write().await;
        records.entry(user_id.to_string()).or_default().window = Some(window);
        self.persist(&records)
    }

    /// Calibrate a user's UTC offset from the local wall-clock time they
    /// reported. Returns the stored offset in minutes.
    pub async fn set_offset_from_report(
        &self,
        user_id: &str,
        reported: TimeOfDay,
        now_utc: DateTime<Utc>,
    ) -> Result<i32, ScheduleError> {
        let offset = Self::offset_from_report(reported, now_utc)?;

        let mut records = self.records.write().await;
        records.entry(user_id.to_string()).or_default().utc_offset_minutes = offset;
        self.persist(&records)?;
        Ok(offset)
    }

    /// Remove the once-daily moment. Returns whether anything was removed.
    pub async fn remove_exact_moment(&self, user_id: &str) -> Result<bool, ScheduleError> {
        self.remove_field(user_id, |record| record.exact_moment.take().is_some())
            .await
    }

    /// Remove the recurring window. Returns whether anything was removed.
    pub async fn remove_window(&self, user_id: &str) -> Result<bool, ScheduleError> {
        self.remove_field(user_id, |record| record.window.take().is_some())
            .await
    }

    /// Persist the current map. Mutating operations already persist; this is
    /// for explicit flushes (e.g. recovering after an earlier disk failure).
    pub async fn save(&self) -> Result<(), ScheduleError> {
        let records = self.records.read().await;
        self.persist(&records)
    }

    /// Difference between a reported local time and the UTC clock, folded
    /// into `[-720, 720]`. `02:00` local against `22:00` UTC is +240, not
    /// -1200.
    fn offset_from_report(
        reported: TimeOfDay,
        now_utc: DateTime<Utc>,
    ) -> Result<i32, ScheduleError> {
        let utc_minute = (now_utc.hour() * 60 + now_utc.minute()) as i64;
        let mut offset = (reported.minute_of_day() as i64 - utc_minute)
            .rem_euclid(MINUTES_PER_DAY as i64);
        if offset > MAX_OFFSET_MINUTES {
            offset -= MINUTES_PER_DAY as i64;
        }

        if offset.abs() > MAX_OFFSET_MINUTES {
            return Err(ScheduleError::OffsetOutOfRange { minutes: offset });
        }
        Ok(offset as i32)
    }

    async fn remove_field(
        &self,
        user_id: &str,
        remove: impl FnOnce(&mut ScheduleRecord) -> bool,
    ) -> Result<bool, ScheduleError> {
        let mut records = self.records.write().await;

        let removed = match records.get_mut(user_id) {
            Some(record) => {
                let removed = remove(record);
                if record.is_empty() {
                    records.remove(user_id);
                    debug!("Pruned empty schedule record for user {user_id}");
                }
                removed
            }
            None => false,
        };

        if removed {
            self.persist(&records)?;
        }
        Ok(removed)
    }

    /// Write the full map to disk. Goes through a sibling temp file and a
    /// rename so a crash mid-write leaves the previous settings intact.
    fn persist(&self, records: &HashMap<String, ScheduleRecord>) -> Result<(), ScheduleError> {
        let failure = |source: std::io::Error| ScheduleError::PersistenceFailure {
            path: self.path.display().to_string(),
            source,
        };

        let contents = serde_json::to_string_pretty(records)
            .map_err(|e| failure(std::io::Error::new(ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents).map_err(failure)?;
        std::fs::rename(&tmp_path, &self.path).map_err(failure)?;

        debug!(
            "Persisted {} schedule record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_store() -> (tempfile::TempDir, ScheduleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::load(dir.path().join("settings.json")).unwrap();
        (dir, store)
    }

    fn utc(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_file_starts_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.len().await, 0);
        assert!(store.get("42").await.is_none());
    }

    #[tokio::test]
    async fn test_set_and_get_exact_moment() {
        let (_dir, store) = temp_store();
        store
            .set_exact_moment("42", "23:30".parse().unwrap())
            .await
            .unwrap();

        let record = store.get("42").await.unwrap();
        assert_eq!(record.exact_moment.unwrap().to_string(), "23:30");
        assert_eq!(record.utc_offset_minutes, 0);
        assert!(record.window.is_none());
    }

    #[tokio::test]
    async fn test_moment_and_window_coexist() {
        let (_dir, store) = temp_store();
        store
            .set_exact_moment("42", "23:30".parse().unwrap())
            .await
            .unwrap();
        store
            .set_window("42", "23:00-08:00".parse().unwrap())
            .await
            .unwrap();

        let record = store.get("42").await.unwrap();
        assert!(record.exact_moment.is_some());
        assert!(record.window.is_some());
    }

    #[tokio::test]
    async fn test_offset_calibration_wraps_forward() {
        // Reported local 02:00 while UTC is 22:00: the user is 4h ahead.
        let (_dir, store) = temp_store();
        let offset = store
            .set_offset_from_report("42", "02:00".parse().unwrap(), utc(22, 0))
            .await
            .unwrap();
        assert_eq!(offset, 240);
        assert_eq!(store.get("42").await.unwrap().utc_offset_minutes, 240);
    }

    #[tokio::test]
    async fn test_offset_calibration_wraps_backward() {
        // Reported local 22:00 while UTC is 02:00: 4h behind, not +20h.
        let (_dir, store) = temp_store();
        let offset = store
            .set_offset_from_report("42", "22:00".parse().unwrap(), utc(2, 0))
            .await
            .unwrap();
        assert_eq!(offset, -240);
    }

    #[tokio::test]
    async fn test_offset_calibration_half_day_boundary() {
        let (_dir, store) = temp_store();
        // Exactly +12h folds to +720, not -720.
        let offset = store
            .set_offset_from_report("42", "12:00".parse().unwrap(), utc(0, 0))
            .await
            .unwrap();
        assert_eq!(offset, 720);
    }

    #[tokio::test]
    async fn test_remove_reports_noop() {
        let (_dir, store) = temp_store();
        assert!(!store.remove_exact_moment("42").await.unwrap());

        store
            .set_exact_moment("42", "10:00".parse().unwrap())
            .await
            .unwrap();
        assert!(store.remove_exact_moment("42").await.unwrap());
        assert!(!store.remove_exact_moment("42").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_record_is_pruned() {
        let (_dir, store) = temp_store();
        store
            .set_exact_moment("42", "10:00".parse().unwrap())
            .await
            .unwrap();
        store.remove_exact_moment("42").await.unwrap();

        assert!(store.get("42").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_calibrated_record_survives_trigger_removal() {
        let (_dir, store) = temp_store();
        store
            .set_offset_from_report("42", "02:00".parse().unwrap(), utc(22, 0))
            .await
            .unwrap();
        store
            .set_window("42", "09:00-17:00".parse().unwrap())
            .await
            .unwrap();
        store.remove_window("42").await.unwrap();

        // The offset alone keeps the record alive.
        assert_eq!(store.get("42").await.unwrap().utc_offset_minutes, 240);
    }

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = ScheduleStore::load(&path).unwrap();
        store
            .set_exact_moment("1", "07:00".parse().unwrap())
            .await
            .unwrap();
        store
            .set_window("2", "23:00-08:00".parse().unwrap())
            .await
            .unwrap();
        store
            .set_offset_from_report("2", "02:00".parse().unwrap(), utc(22, 0))
            .await
            .unwrap();
        let before = store.snapshot().await;

        let reloaded = ScheduleStore::load(&path).unwrap();
        assert_eq!(reloaded.snapshot().await, before);

        // Saving without mutation reproduces the same semantic content.
        reloaded.save().await.unwrap();
        let again = ScheduleStore::load(&path).unwrap();
        assert_eq!(again.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_load_and_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        match ScheduleStore::load(&path) {
            Err(ScheduleError::LoadCorruption { .. }) => {}
            other => panic!("expected LoadCorruption, got {other:?}"),
        }

        // The corrupt contents are untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
