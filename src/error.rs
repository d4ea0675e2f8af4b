//! Error types for bankbook

use crate::domain::{AccountNumber, AccountType};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bankbook
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Account number already exists: {0}")]
    DuplicateAccount(AccountNumber),

    #[error("Invalid account type: '{0}'")]
    InvalidAccountType(String),

    #[error("Minimum opening deposit for a {account_type} account is {minimum}, got {deposit}")]
    InsufficientInitialDeposit {
        account_type: AccountType,
        minimum: u64,
        deposit: u64,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error("Balance would overflow")]
    BalanceOverflow,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("No such account found: {0}")]
    NoSuchAccount(AccountNumber),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Console I/O error: {0}")]
    Console(#[source] std::io::Error),

    #[error("Not a bankbook directory: {0}")]
    NotBankDirectory(PathBuf),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Corrupt store {path}: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl BankError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BankError::NotBankDirectory(_) => 2,
            BankError::Storage(_) | BankError::CorruptStore { .. } => 3,
            BankError::Config(_) | BankError::TomlDeserialize(_) | BankError::TomlSerialize(_) => 4,
            _ => 1,
        }
    }

    /// Whether the error comes from the backing files rather than from the
    /// request itself. The interactive session stops on these.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            BankError::Storage(_) | BankError::CorruptStore { .. }
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            BankError::NotBankDirectory(path) => {
                format!(
                    "Not a bankbook directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'bankbook init' in this directory to create the account stores\n\
                    • Pass --data-dir to point at an existing data directory\n\
                    • Set BANKBOOK_HOME environment variable to your data directory",
                    path.display()
                )
            }
            BankError::CorruptStore { path, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Restore {} from a backup\n\
                    • Move the file aside to start with an empty store",
                    self,
                    path.display()
                )
            }
            BankError::InvalidAccountType(_) => {
                format!("{}\n\nChoose 'C' for Current or 'S' for Saving.", self)
            }
            BankError::InsufficientInitialDeposit { .. } => {
                format!(
                    "{}\n\nMinimum 500 for Saving and 1000 for Current.",
                    self
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using BankError
pub type Result<T> = std::result::Result<T, BankError>;
