//! Account records, account types and balance arithmetic

use crate::error::{BankError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-chosen key identifying an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(u64);

impl AccountNumber {
    pub fn new(value: u64) -> Self {
        AccountNumber(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AccountNumber {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(AccountNumber)
            .map_err(|_| BankError::InvalidInput(format!("'{}' is not an account number", s.trim())))
    }
}

/// Account categories, each with its own minimum opening deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// Current account (`C`)
    Current,
    /// Saving account (`S`)
    Savings,
}

impl AccountType {
    /// Smallest deposit an account of this type can be opened with
    pub fn minimum_opening_deposit(&self) -> u64 {
        match self {
            AccountType::Current => 1000,
            AccountType::Savings => 500,
        }
    }

    /// Single-letter code shown in listings
    pub fn code(&self) -> &'static str {
        match self {
            AccountType::Current => "C",
            AccountType::Savings => "S",
        }
    }

    /// Check an opening deposit against this type's minimum
    pub fn check_opening_deposit(&self, deposit: u64) -> Result<()> {
        let minimum = self.minimum_opening_deposit();
        if deposit < minimum {
            return Err(BankError::InsufficientInitialDeposit {
                account_type: *self,
                minimum,
                deposit,
            });
        }
        Ok(())
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Current => write!(f, "Current"),
            AccountType::Savings => write!(f, "Saving"),
        }
    }
}

impl FromStr for AccountType {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "current" => Ok(AccountType::Current),
            "s" | "saving" | "savings" => Ok(AccountType::Savings),
            _ => Err(BankError::InvalidAccountType(s.trim().to_string())),
        }
    }
}

/// Direction of a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    /// Verb used in prompts ("deposit", "withdraw")
    pub fn verb(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

/// A single account as persisted in the account store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_number: AccountNumber,
    pub name: String,
    pub account_type: AccountType,
    pub balance: u64,
}

impl AccountRecord {
    pub fn new(
        account_number: AccountNumber,
        name: String,
        account_type: AccountType,
        balance: u64,
    ) -> Self {
        AccountRecord {
            account_number,
            name,
            account_type,
            balance,
        }
    }

    /// Compute the balance after applying a transaction.
    /// The record is left untouched; callers persist the result.
    pub fn balance_after(&self, kind: TransactionKind, amount: u64) -> Result<u64> {
        match kind {
            TransactionKind::Deposit => self
                .balance
                .checked_add(amount)
                .ok_or(BankError::BalanceOverflow),
            TransactionKind::Withdraw => {
                if amount > self.balance {
                    return Err(BankError::InsufficientFunds {
                        balance: self.balance,
                        requested: amount,
                    });
                }
                Ok(self.balance - amount)
            }
        }
    }
}
