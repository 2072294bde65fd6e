//! User preferences: dark mode and the default work-session length

use crate::error::TaskResult;
use crate::storage::{Persistence, Record};
use std::sync::Arc;
use tracing::info;

/// Work-session length used until the user picks another
pub const DEFAULT_WORK_MINUTES: u32 = 40;

pub struct Settings {
    dark_mode: bool,
    work_minutes: u32,
    persistence: Arc<dyn Persistence>,
}

impl Settings {
    /// Build from persisted values, falling back to defaults for absent keys
    pub fn new(
        dark_mode: Option<bool>,
        work_minutes: Option<u32>,
        persistence: Arc<dyn Persistence>,
    ) -> Self {
        Self {
            dark_mode: dark_mode.unwrap_or(false),
            work_minutes: work_minutes.unwrap_or(DEFAULT_WORK_MINUTES).max(1),
            persistence,
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    /// Flip dark mode and return the new value
    ///
    /// The stored value changes only after it has been written.
    pub fn toggle_dark_mode(&mut self) -> TaskResult<bool> {
        let dark_mode = !self.dark_mode;
        self.persistence.save(Record::DarkMode(dark_mode))?;
        self.dark_mode = dark_mode;
        info!(dark_mode = self.dark_mode, "toggled dark mode");
        Ok(self.dark_mode)
    }

    /// Store a new session length; values below one minute become one
    pub fn set_work_minutes(&mut self, minutes: u32) -> TaskResult<u32> {
        let minutes = minutes.max(1);
        self.persistence.save(Record::WorkMinutes(minutes))?;
        self.work_minutes = minutes;
        info!(work_minutes = minutes, "updated work minutes");
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_defaults() {
        let settings = Settings::new(None, None, Arc::new(MemoryStorage::new()));
        assert!(!settings.dark_mode());
        assert_eq!(settings.work_minutes(), DEFAULT_WORK_MINUTES);
    }

    #[test]
    fn test_loaded_zero_minutes_is_clamped() {
        let settings = Settings::new(Some(true), Some(0), Arc::new(MemoryStorage::new()));
        assert!(settings.dark_mode());
        assert_eq!(settings.work_minutes(), 1);
    }

    #[test]
    fn test_changes_are_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let mut settings = Settings::new(None, None, storage.clone());

        assert!(settings.toggle_dark_mode().unwrap());
        assert_eq!(settings.set_work_minutes(0).unwrap(), 1);
        assert_eq!(settings.set_work_minutes(25).unwrap(), 25);

        assert_eq!(storage.writes(), vec!["dark_mode", "work_minutes", "work_minutes"]);
        let snapshot = storage.snapshot();
        assert_eq!(snapshot.dark_mode, Some(true));
        assert_eq!(snapshot.work_minutes, Some(25));
    }

    #[test]
    fn test_failed_save_keeps_old_values() {
        let storage = Arc::new(MemoryStorage::new());
        let mut settings = Settings::new(None, Some(30), storage.clone());

        storage.fail_saves(true);
        assert!(settings.toggle_dark_mode().is_err());
        assert!(settings.set_work_minutes(50).is_err());
        assert!(!settings.dark_mode());
        assert_eq!(settings.work_minutes(), 30);
        assert!(storage.writes().is_empty());
    }
}
