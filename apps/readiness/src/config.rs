use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Offset, Utc};

/// Upper bound for `READINESS_RECENT_WINDOW_DAYS`, roughly a century.
pub const MAX_RECENT_WINDOW_DAYS: i64 = 36_500;

/// Engine tunables loaded from environment variables.
/// Every variable is optional; unset values fall back to `EngineConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of score calculations kept in a student's history.
    pub score_history_cap: usize,
    /// Window (in days) for counting "recent" manual coding logs.
    pub recent_window_days: i64,
    /// Offset from UTC, in minutes, that decides where a calendar day starts.
    pub utc_offset_minutes: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_history_cap: 30,
            recent_window_days: 30,
            utc_offset_minutes: 0,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Self::default();
        let config = EngineConfig {
            score_history_cap: optional_env("READINESS_SCORE_HISTORY_CAP")?
                .unwrap_or(defaults.score_history_cap),
            recent_window_days: optional_env("READINESS_RECENT_WINDOW_DAYS")?
                .unwrap_or(defaults.recent_window_days),
            utc_offset_minutes: optional_env("READINESS_UTC_OFFSET_MINUTES")?
                .unwrap_or(defaults.utc_offset_minutes),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.score_history_cap == 0 {
            bail!("READINESS_SCORE_HISTORY_CAP must be at least 1");
        }
        if !(1..=MAX_RECENT_WINDOW_DAYS).contains(&self.recent_window_days) {
            bail!(
                "READINESS_RECENT_WINDOW_DAYS must be within 1..={}, got {}",
                MAX_RECENT_WINDOW_DAYS,
                self.recent_window_days
            );
        }
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            bail!(
                "READINESS_UTC_OFFSET_MINUTES must be within a day, got {}",
                self.utc_offset_minutes
            );
        }
        Ok(())
    }

    /// The fixed offset used to bucket timestamps into calendar days.
    pub fn day_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
