//! Application layer - Use cases and orchestration

pub mod account_service;
pub mod init;

pub use account_service::AccountService;
