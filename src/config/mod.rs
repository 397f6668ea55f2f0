//! Configuration management module.
//!
//! This module handles loading and saving application configuration: the
//! backend API token and base URL, plus engine tunables.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/leadline";

fn default_base_url() -> String {
    "https://app.leadline.io/api/v1".to_string()
}

fn default_search_debounce_ms() -> u64 {
    500
}

/// Oversees management of the configuration file.
///
#[derive(Clone)]
pub struct Config {
    pub api_token: Option<String>,
    pub base_url: String,
    pub search_debounce_ms: u64,
    file_path: Option<PathBuf>,
}

/// Define specification for the configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    pub api_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Config {
    /// Return a new instance with defaults and no token.
    ///
    pub fn new() -> Config {
        Config {
            api_token: None,
            base_url: default_base_url(),
            search_debounce_ms: default_search_debounce_ms(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// path if provided. A missing file is not an error: the token stays
    /// unset and the front end handles onboarding.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Try to create dir path if it doesn't exist
        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        // Specify config file path
        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.api_token = Some(data.api_token);
            self.base_url = data.base_url;
            self.search_debounce_ms = data.search_debounce_ms;
        }

        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let api_token = self
            .api_token
            .as_ref()
            .ok_or(ConfigError::ApiTokenNotSet)?;

        let data = FileSpec {
            api_token: api_token.clone(),
            base_url: self.base_url.clone(),
            search_debounce_ms: self.search_debounce_ms,
        };
        let contents = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::SaveFailed {
                path: file_path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Return the default configuration directory path.
    ///
    fn default_path() -> Result<PathBuf, ConfigError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::HomeDirectoryNotFound),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}
