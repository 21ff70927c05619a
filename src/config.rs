use std::{env, path::PathBuf, time::Duration};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use thiserror::Error;

use crate::prefs::{
    ACCESS_TOKEN_KEY, AUTH_TYPE_KEY,
    storage::{Storage, StorageError},
};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_LYRICS_URL: &str = "http://localhost:3000/api/v1/app/lyrics";

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone())).ok().map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone())).ok().map(PathBuf::from);
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = DATA_FOLDER.clone() {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = CONFIG_FOLDER.clone() {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

pub fn settings_path() -> PathBuf {
    env::var("NOWPLAYING_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| get_config_dir().join("settings.json"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No access token found, set SPOTIFY_ACCESS_TOKEN")]
    MissingToken,

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub api_base_url: String,
    pub lyrics_url: String,
    pub poll_interval: Duration,
    pub volume_step: u8,
    pub seek_step_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base_url: DEFAULT_API_URL.to_string(),
            lyrics_url: DEFAULT_LYRICS_URL.to_string(),
            poll_interval: Duration::from_millis(1000),
            volume_step: 7,
            seek_step_ms: 10_000,
        }
    }
}

impl Config {
    pub fn load(storage: &mut Storage) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), storage)
    }

    /// Builds the config from `lookup` (the environment in production). A
    /// token from the environment is persisted so that sign-out can clear it.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        storage: &mut Storage,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup("SPOTIFY_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => {
                storage.set(ACCESS_TOKEN_KEY, token.clone())?;
                storage.set(AUTH_TYPE_KEY, "token")?;
                config.access_token = token;
            }
            None => {
                config.access_token = storage
                    .get(ACCESS_TOKEN_KEY)
                    .map(str::to_string)
                    .ok_or(ConfigError::MissingToken)?;
            }
        }

        if let Some(url) = lookup("SPOTIFY_API_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = lookup("NOWPLAYING_LYRICS_URL") {
            config.lyrics_url = url;
        }
        if let Some(ms) = lookup("NOWPLAYING_POLL_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| ConfigError::Invalid("NOWPLAYING_POLL_MS", ms.clone()))?;
            config.poll_interval = Duration::from_millis(ms.max(100));
        }

        Ok(config)
    }
}
