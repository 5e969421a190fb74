use crate::dates::parse_iso;
use crate::error::{AppError, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

pub const INPUT_VAR: &str = "EV_SITES_INPUT";
pub const OUTPUT_DIR_VAR: &str = "EV_SITES_OUTPUT_DIR";
pub const TODAY_VAR: &str = "EV_SITES_TODAY";

const DEFAULT_INPUT: &str = "suivi_bornes.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Pinned evaluation date; `None` means the local current date.
    pub today: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            today: None,
        }
    }
}

impl Settings {
    /// Read settings from the process environment, after loading `.env` if
    /// one is present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(input) = lookup(INPUT_VAR).filter(|v| !v.trim().is_empty()) {
            settings.input = PathBuf::from(input.trim());
        }
        if let Some(dir) = lookup(OUTPUT_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            settings.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup(TODAY_VAR).filter(|v| !v.trim().is_empty()) {
            let date = parse_iso(&raw).ok_or_else(|| {
                AppError::Config(format!("{TODAY_VAR} must be YYYY-MM-DD, got {raw:?}"))
            })?;
            settings.today = Some(date);
        }
        Ok(settings)
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
