//! Configuration management

use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the hidden directory holding config and stores
pub const DATA_DIR: &str = ".bankbook";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Password that unlocks the admin menu
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Account store file, relative to the data directory
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    /// Credential store file, relative to the data directory
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Symbol printed in front of amounts
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_accounts_file() -> String {
    "accounts.bin".to_string()
}

fn default_credentials_file() -> String {
    "credentials.bin".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            admin_password: default_admin_password(),
            accounts_file: default_accounts_file(),
            credentials_file: default_credentials_file(),
            currency: default_currency(),
            created: Utc::now(),
        }
    }
}

impl Config {
    /// Create a default config with the given admin password
    pub fn with_admin_password(admin_password: String) -> Self {
        Config {
            admin_password,
            ..Config::default()
        }
    }

    /// Load config from .bankbook/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(DATA_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BankError::NotBankDirectory(path.to_path_buf())
            } else {
                BankError::Storage(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| BankError::Config(format!("Failed to parse config.toml: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to .bankbook/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let data_dir = path.join(DATA_DIR);
        let config_path = data_dir.join(CONFIG_FILE);

        // Ensure .bankbook directory exists
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Reject settings that would make the stores unusable
    pub fn validate(&self) -> Result<()> {
        if self.accounts_file.trim().is_empty() || self.credentials_file.trim().is_empty() {
            return Err(BankError::Config(
                "Store file names must not be empty".to_string(),
            ));
        }
        if self.accounts_file == self.credentials_file {
            return Err(BankError::Config(format!(
                "accounts_file and credentials_file must differ (both '{}')",
                self.accounts_file
            )));
        }
        Ok(())
    }
}
