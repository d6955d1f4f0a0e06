use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};

use crate::calendar::parse_date;

pub const DEFAULT_DATA_DIR: &str = "data";

/// Inputs shared by every command: where the snapshot lives and which day
/// counts as "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub as_of: NaiveDate,
}

impl Settings {
    pub fn resolve(data_dir: Option<PathBuf>, as_of: Option<&str>) -> anyhow::Result<Self> {
        let as_of = match as_of {
            Some(raw) => parse_date(raw).with_context(|| format!("invalid --as-of date `{raw}`"))?,
            None => Local::now().date_naive(),
        };

        Ok(Self {
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            as_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let settings = Settings::resolve(Some(PathBuf::from("/srv/academy")), Some("2024-03-01")).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/academy"));
        assert_eq!(settings.as_of, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn defaults_to_local_data_dir_and_today() {
        let settings = Settings::resolve(None, None).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(settings.as_of, Local::now().date_naive());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Settings::resolve(None, Some("01/03/2024")).is_err());
    }
}
