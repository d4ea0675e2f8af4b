//! Domain layer - Account model and business rules

pub mod account;
pub mod auth;

pub use account::{AccountNumber, AccountRecord, AccountType, TransactionKind};
pub use auth::AuthResult;
