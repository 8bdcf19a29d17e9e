//! Configuration management for the custom database scripts
//!
//! Settings come from an optional `config.toml` layered with environment
//! variables (`CUSTOM_DB__DB_USER`, `CUSTOM_DB__STORE`, ...). They are read
//! once at startup and handed to the scripts explicitly.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::hasher::DEFAULT_COST;
use crate::driver::ConnectionOptions;

/// Which kind of store the scripts talk to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    /// No scripts implemented; every operation is a configuration error.
    Bare,
    #[default]
    Relational,
}

/// Complete script configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScriptsConfig {
    pub store: StoreType,

    // ═══ STORE CONNECTION ═══
    /// Database user the scripts connect as
    pub db_user: String,

    /// Password of `db_user`
    pub db_user_password: String,

    /// Driver connect string (e.g. `host:1521/service`)
    pub connect_string: String,

    // ═══ HASHING ═══
    /// bcrypt work factor for new hashes (4..=31)
    pub bcrypt_cost: u32,

    /// TOML file seeding the in-memory store, relative to the config file
    pub users_file: Option<String>,

    #[serde(skip)]
    pub(crate) config_dir: Option<PathBuf>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            store: StoreType::default(),
            db_user: "dbUser".to_string(),
            db_user_password: String::new(),
            connect_string: "localhost/XE".to_string(),
            bcrypt_cost: DEFAULT_COST,
            users_file: None,
            config_dir: None,
        }
    }
}

impl ScriptsConfig {
    /// Load configuration from `path` (or `./config.toml`) with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name("config").required(false),
        };

        let mut config: ScriptsConfig = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CUSTOM_DB").prefix_separator("__").separator("__"))
            .build()?
            .try_deserialize()?;
        config.config_dir = path.and_then(Path::parent).map(Path::to_path_buf);

        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(config::ConfigError::Message(format!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }

        if self.store == StoreType::Relational {
            if self.db_user.is_empty() {
                return Err(config::ConfigError::Message(
                    "db_user cannot be empty".into(),
                ));
            }

            if self.connect_string.is_empty() {
                return Err(config::ConfigError::Message(
                    "connect_string cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Connection parameters handed to the driver
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            user: self.db_user.clone(),
            password: self.db_user_password.clone(),
            connect_string: self.connect_string.clone(),
        }
    }

    /// Get users file as PathBuf, resolved against the config file's directory
    pub fn users_file_path(&self) -> Option<PathBuf> {
        let file = self.users_file.as_ref()?;
        Some(match &self.config_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        })
    }
}
