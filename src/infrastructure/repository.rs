//! File system repository

use crate::domain::{AccountNumber, AccountRecord};
use crate::error::{BankError, Result};
use crate::infrastructure::config::DATA_DIR;
use crate::infrastructure::store::{RecordStore, Table};
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub type AccountTable = Table<AccountNumber, AccountRecord>;
pub type CredentialTable = Table<AccountNumber, String>;

/// Marker written while both stores are being replaced
const COMMIT_MARKER: &str = "commit.pending";

/// Tables written by one operation, committed together
#[derive(Debug, Default)]
pub struct Changeset {
    pub accounts: Option<AccountTable>,
    pub credentials: Option<CredentialTable>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(mut self, table: AccountTable) -> Self {
        self.accounts = Some(table);
        self
    }

    pub fn credentials(mut self, table: CredentialTable) -> Self {
        self.credentials = Some(table);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_none() && self.credentials.is_none()
    }
}

/// Abstract repository for account persistence
pub trait BankRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Configuration the repository was opened with
    fn config(&self) -> &Config;

    /// Load the full account table
    fn load_accounts(&self) -> Result<AccountTable>;

    /// Load the full credential table
    fn load_credentials(&self) -> Result<CredentialTable>;

    /// Persist every table in the changeset as one unit
    fn commit(&self, changeset: Changeset) -> Result<()>;
}

/// File system implementation of BankRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    root: PathBuf,
    config: Config,
    accounts: RecordStore<AccountNumber, AccountRecord>,
    credentials: RecordStore<AccountNumber, String>,
}

impl FileSystemRepository {
    /// Open the repository at `root`, creating the data directory,
    /// default config and empty stores where missing.
    pub fn open(root: PathBuf) -> Result<Self> {
        let config = match Config::load_from_dir(&root) {
            Ok(config) => config,
            Err(BankError::NotBankDirectory(_)) => {
                info!(root = %root.display(), "no config found, writing defaults");
                let config = Config::default();
                config.save_to_dir(&root)?;
                config
            }
            Err(e) => return Err(e),
        };

        Self::open_with_config(root, config)
    }

    /// Open a repository that `init` has already set up.
    /// A root without a config is not a bank directory.
    pub fn open_existing(root: PathBuf) -> Result<Self> {
        let config = Config::load_from_dir(&root)?;
        Self::open_with_config(root, config)
    }

    /// Create a fresh data directory. Fails if one already exists.
    pub fn initialize(root: PathBuf, config: Config) -> Result<Self> {
        if Self::has_data_dir(&root) {
            return Err(BankError::Config(format!(
                "Directory already initialized: {}",
                root.display()
            )));
        }

        config.validate()?;
        config.save_to_dir(&root)?;
        Self::open_with_config(root, config)
    }

    fn open_with_config(root: PathBuf, config: Config) -> Result<Self> {
        let data_dir = root.join(DATA_DIR);
        let repo = FileSystemRepository {
            accounts: RecordStore::new(data_dir.join(&config.accounts_file)),
            credentials: RecordStore::new(data_dir.join(&config.credentials_file)),
            root,
            config,
        };

        repo.recover()?;
        repo.accounts.initialize_if_absent()?;
        repo.credentials.initialize_if_absent()?;
        Ok(repo)
    }

    /// Resolve the data directory from BANKBOOK_HOME, falling back to the
    /// current directory
    pub fn discover_root() -> Result<PathBuf> {
        match std::env::var_os("BANKBOOK_HOME") {
            Some(root) => Ok(PathBuf::from(root)),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Check if a path contains a .bankbook directory
    fn has_data_dir(path: &Path) -> bool {
        path.join(DATA_DIR).is_dir()
    }

    fn marker_path(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(COMMIT_MARKER)
    }

    /// Finish or roll back a commit interrupted part way through.
    ///
    /// With the marker present both staged tables were fully written, so they
    /// are promoted. Without it any staged file is incomplete and is dropped.
    fn recover(&self) -> Result<()> {
        let marker = self.marker_path();

        if marker.exists() {
            warn!("found interrupted commit, rolling forward");
            self.accounts.promote()?;
            self.credentials.promote()?;
            fs::remove_file(&marker)?;
            return Ok(());
        }

        if self.accounts.discard_staged()? {
            warn!(path = %self.accounts.path().display(), "discarded stray staged store");
        }
        if self.credentials.discard_staged()? {
            warn!(path = %self.credentials.path().display(), "discarded stray staged store");
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn account_store(&self) -> &RecordStore<AccountNumber, AccountRecord> {
        &self.accounts
    }

    #[cfg(test)]
    pub(crate) fn credential_store(&self) -> &RecordStore<AccountNumber, String> {
        &self.credentials
    }
}

impl BankRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn load_accounts(&self) -> Result<AccountTable> {
        self.accounts.load()
    }

    fn load_credentials(&self) -> Result<CredentialTable> {
        self.credentials.load()
    }

    fn commit(&self, changeset: Changeset) -> Result<()> {
        match changeset {
            Changeset {
                accounts: Some(accounts),
                credentials: Some(credentials),
            } => {
                self.accounts.stage(&accounts)?;
                self.credentials.stage(&credentials)?;

                let marker = self.marker_path();
                fs::write(&marker, b"")?;
                self.accounts.promote()?;
                self.credentials.promote()?;
                fs::remove_file(&marker)?;
                debug!("committed accounts and credentials");
            }
            Changeset {
                accounts: Some(accounts),
                credentials: None,
            } => self.accounts.save(&accounts)?,
            Changeset {
                accounts: None,
                credentials: Some(credentials),
            } => self.credentials.save(&credentials)?,
            Changeset {
                accounts: None,
                credentials: None,
            } => {}
        }
        Ok(())
    }
}
