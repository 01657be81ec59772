use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 7788;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TITLE: &str = "Model Arena";
pub const LINKS_FILE: &str = "link.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub title: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let title = lookup("APP_TITLE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Self {
            data_dir,
            port,
            title,
        }
    }

    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }
}
