//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod repository;
pub mod store;

pub use config::Config;
pub use repository::{
    AccountTable, BankRepository, Changeset, CredentialTable, FileSystemRepository,
};
pub use store::{RecordStore, Table};
