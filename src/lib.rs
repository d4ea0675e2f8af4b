//! bankbook - Console bank account manager
//!
//! Keeps account records and their passwords in two file-backed stores and
//! drives them through an interactive admin/user menu.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::BankError;
