//! Initialize data directory use case

use crate::error::Result;
use crate::infrastructure::{Config, FileSystemRepository};
use std::fs;
use std::path::Path;

/// Initialize a new data directory at the specified path.
pub fn init(path: &Path, admin_password: Option<String>) -> Result<FileSystemRepository> {
    // Create the directory if it doesn't exist
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let config = match admin_password {
        Some(password) => Config::with_admin_password(password),
        None => Config::default(),
    };

    FileSystemRepository::initialize(path.to_path_buf(), config)
}
