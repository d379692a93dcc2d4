use std::time::Duration;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("tick interval must be > 0 milliseconds")]
    InvalidTickInterval,

    #[error("storage key cannot be empty")]
    EmptyStorageKey,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_secs: u32,
    tick_interval_ms: u64,
    storage_key: String,
}

impl QuizSettings {
    pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
    pub const DEFAULT_STORAGE_KEY: &'static str = "quizState";

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a value is zero or the key is blank.
    pub fn new(
        time_limit_secs: u32,
        tick_interval_ms: u64,
        storage_key: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        let storage_key = storage_key.into();
        if time_limit_secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }
        if tick_interval_ms == 0 {
            return Err(SettingsError::InvalidTickInterval);
        }
        if storage_key.trim().is_empty() {
            return Err(SettingsError::EmptyStorageKey);
        }
        Ok(Self {
            time_limit_secs,
            tick_interval_ms,
            storage_key,
        })
    }

    /// Returns a copy with a different time limit.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` for zero.
    pub fn with_time_limit(self, time_limit_secs: u32) -> Result<Self, SettingsError> {
        Self::new(time_limit_secs, self.tick_interval_ms, self.storage_key)
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: Self::DEFAULT_TIME_LIMIT_SECS,
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            storage_key: Self::DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}
