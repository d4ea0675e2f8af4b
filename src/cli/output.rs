//! Output formatting utilities

use crate::domain::AccountRecord;
use crate::error::BankError;

/// Format the account holder table shown to the admin
pub fn format_account_table(records: &[AccountRecord]) -> String {
    if records.is_empty() {
        return "No accounts found.".to_string();
    }

    let mut output = format!(
        "{:<10}{:<20}{:<10}{:<10}\n",
        "AccNo", "Name", "Type", "Balance"
    );
    for record in records {
        output.push_str(&format!(
            "{:<10}{:<20}{:<10}{:<10}\n",
            record.account_number.to_string(),
            record.name,
            record.account_type.code(),
            record.balance
        ));
    }
    output
}

/// Format an amount with the configured currency symbol
pub fn format_amount(currency: &str, amount: u64) -> String {
    format!("{}{}", currency, amount)
}

/// Message shown in the menu when a request is refused
pub fn format_error(err: &BankError) -> String {
    match err {
        BankError::AccountNotFound(_) => "Account not found.".to_string(),
        BankError::DuplicateAccount(_) => "Account number already exists.".to_string(),
        BankError::InsufficientFunds { .. } => "!! Insufficient funds.".to_string(),
        BankError::WrongPassword => "Incorrect Password".to_string(),
        BankError::NoSuchAccount(_) => "No such account found".to_string(),
        _ => err.display_with_suggestions(),
    }
}
