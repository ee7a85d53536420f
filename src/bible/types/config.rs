//! Engine configuration.

use chrono::NaiveDate;
use log::warn;

/// Environment variable holding the reading plan's first day (`YYYY-MM-DD`).
pub const PLAN_START_ENV: &str = "LECTURA_PLAN_START";
/// Environment variable bounding the chapter cache (positive integer).
pub const CACHE_CAPACITY_ENV: &str = "LECTURA_CACHE_CAPACITY";

/// Runtime settings for a [`ReadingEngine`](crate::ReadingEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Day on which the plan reads the first chapter of the canon.
    pub plan_start: NaiveDate,
    /// Maximum number of cached chapters. `None` keeps every chapter for the session.
    pub cache_capacity: Option<usize>,
}

impl EngineConfig {
    pub fn default_plan_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
    }

    /// Builds a configuration from the environment, falling back to the defaults for
    /// anything missing or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let plan_start = match std::env::var(PLAN_START_ENV) {
            Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").unwrap_or_else(|e| {
                warn!("Ignoring {}={:?}: {}", PLAN_START_ENV, raw, e);
                defaults.plan_start
            }),
            Err(_) => defaults.plan_start,
        };
        let cache_capacity = std::env::var(CACHE_CAPACITY_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .or(defaults.cache_capacity);

        Self {
            plan_start,
            cache_capacity,
        }
    }

    pub fn with_plan_start(mut self, plan_start: NaiveDate) -> Self {
        self.plan_start = plan_start;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            plan_start: Self::default_plan_start(),
            cache_capacity: None,
        }
    }
}
