//! Password check outcomes

use crate::domain::AccountNumber;
use crate::error::{BankError, Result};

/// Outcome of checking a password against the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Ok,
    WrongPassword,
    NoSuchAccount,
}

impl AuthResult {
    /// Compare a stored password (if any) with the one supplied
    pub fn check(stored: Option<&str>, supplied: &str) -> Self {
        match stored {
            None => AuthResult::NoSuchAccount,
            Some(password) if password == supplied => AuthResult::Ok,
            Some(_) => AuthResult::WrongPassword,
        }
    }

    /// Turn a failed check into the matching error
    pub fn into_result(self, account_number: AccountNumber) -> Result<()> {
        match self {
            AuthResult::Ok => Ok(()),
            AuthResult::WrongPassword => Err(BankError::WrongPassword),
            AuthResult::NoSuchAccount => Err(BankError::NoSuchAccount(account_number)),
        }
    }
}
