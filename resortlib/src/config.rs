//! Настройки курорта из окружения (`RESORT_*`).

use crate::{
    error::{ResortError, Result},
    payments::DuplicatePolicy,
};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

pub const ENV_UTC_OFFSET_HOURS: &str = "RESORT_UTC_OFFSET_HOURS";
pub const ENV_CURRENCY_SYMBOL: &str = "RESORT_CURRENCY_SYMBOL";
pub const ENV_DUPLICATE_CATEGORIES: &str = "RESORT_DUPLICATE_CATEGORIES";

const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResortConfig {
    pub utc_offset: FixedOffset,
    pub currency_symbol: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ResortConfig {
    fn default() -> Self {
        ResortConfig {
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
            currency_symbol: "₱".to_string(),
            duplicate_policy: DuplicatePolicy::LastWins,
        }
    }
}

fn offset_hours(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ResortError::Config(format!("utc offset out of range: {hours}")))
}

impl ResortConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Незаданная переменная даёт значение по умолчанию, некорректная даёт ошибку.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = ResortConfig::default();

        if let Some(raw) = lookup(ENV_UTC_OFFSET_HOURS) {
            let hours = raw
                .trim()
                .parse::<i32>()
                .map_err(|e| ResortError::Config(format!("{ENV_UTC_OFFSET_HOURS}: {e}")))?;
            cfg.utc_offset = offset_hours(hours)?;
        }
        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            cfg.currency_symbol = symbol;
        }
        if let Some(raw) = lookup(ENV_DUPLICATE_CATEGORIES) {
            cfg.duplicate_policy = raw.parse::<DuplicatePolicy>()?;
        }

        Ok(cfg)
    }

    /// Текущее местное время курорта.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }
}
