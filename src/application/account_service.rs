//! Account use cases: create, authenticate, transact, modify, close, list

use crate::domain::{AccountNumber, AccountRecord, AccountType, AuthResult, TransactionKind};
use crate::error::{BankError, Result};
use crate::infrastructure::{BankRepository, Changeset};
use std::str::FromStr;
use tracing::{info, warn};

/// Service for every read and write against the account stores.
///
/// Each call loads what it needs, applies one change and commits it, so no
/// record state lives in the service between calls.
pub struct AccountService<R: BankRepository> {
    repository: R,
}

impl<R: BankRepository> AccountService<R> {
    /// Create a new account service
    pub fn new(repository: R) -> Self {
        AccountService { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Fail with `DuplicateAccount` if either store already holds the number
    pub fn ensure_available(&self, account_number: AccountNumber) -> Result<()> {
        let accounts = self.repository.load_accounts()?;
        if accounts.contains_key(&account_number) {
            return Err(BankError::DuplicateAccount(account_number));
        }
        let credentials = self.repository.load_credentials()?;
        if credentials.contains_key(&account_number) {
            return Err(BankError::DuplicateAccount(account_number));
        }
        Ok(())
    }

    /// Open a new account with its password.
    ///
    /// `account_type` is the raw code entered by the user (`C` or `S`).
    pub fn create_account(
        &self,
        account_number: AccountNumber,
        name: &str,
        account_type: &str,
        initial_deposit: u64,
        password: &str,
    ) -> Result<AccountNumber> {
        let mut accounts = self.repository.load_accounts()?;
        let mut credentials = self.repository.load_credentials()?;

        if accounts.contains_key(&account_number) || credentials.contains_key(&account_number) {
            return Err(BankError::DuplicateAccount(account_number));
        }

        let account_type = AccountType::from_str(account_type)?;
        account_type.check_opening_deposit(initial_deposit)?;

        accounts.insert(
            account_number,
            AccountRecord::new(
                account_number,
                name.to_string(),
                account_type,
                initial_deposit,
            ),
        );
        credentials.insert(account_number, password.to_string());

        self.repository
            .commit(Changeset::new().accounts(accounts).credentials(credentials))?;

        info!(account = %account_number, %account_type, "account created");
        Ok(account_number)
    }

    /// Check a password. Only the credential store is consulted.
    pub fn authenticate(&self, account_number: AccountNumber, password: &str) -> Result<AuthResult> {
        let credentials = self.repository.load_credentials()?;
        let result = AuthResult::check(
            credentials.get(&account_number).map(String::as_str),
            password,
        );
        if result != AuthResult::Ok {
            info!(account = %account_number, ?result, "authentication failed");
        }
        Ok(result)
    }

    pub fn get_account(&self, account_number: AccountNumber) -> Result<AccountRecord> {
        self.repository
            .load_accounts()?
            .remove(&account_number)
            .ok_or(BankError::AccountNotFound(account_number))
    }

    pub fn get_balance(&self, account_number: AccountNumber) -> Result<u64> {
        self.get_account(account_number).map(|record| record.balance)
    }

    /// Apply a deposit or withdrawal and return the new balance.
    /// Nothing is written when the transaction is rejected.
    pub fn apply_transaction(
        &self,
        account_number: AccountNumber,
        kind: TransactionKind,
        amount: u64,
    ) -> Result<u64> {
        let mut accounts = self.repository.load_accounts()?;
        let record = accounts
            .get_mut(&account_number)
            .ok_or(BankError::AccountNotFound(account_number))?;

        let balance = record.balance_after(kind, amount)?;
        record.balance = balance;

        self.repository.commit(Changeset::new().accounts(accounts))?;
        info!(account = %account_number, ?kind, amount, balance, "transaction applied");
        Ok(balance)
    }

    pub fn deposit(&self, account_number: AccountNumber, amount: u64) -> Result<u64> {
        self.apply_transaction(account_number, TransactionKind::Deposit, amount)
    }

    pub fn withdraw(&self, account_number: AccountNumber, amount: u64) -> Result<u64> {
        self.apply_transaction(account_number, TransactionKind::Withdraw, amount)
    }

    /// Replace every field of an existing record. Opening minimums are not
    /// re-checked here.
    pub fn modify_account(
        &self,
        account_number: AccountNumber,
        name: &str,
        account_type: AccountType,
        balance: u64,
    ) -> Result<()> {
        let mut accounts = self.repository.load_accounts()?;
        if !accounts.contains_key(&account_number) {
            return Err(BankError::AccountNotFound(account_number));
        }

        accounts.insert(
            account_number,
            AccountRecord::new(account_number, name.to_string(), account_type, balance),
        );
        self.repository.commit(Changeset::new().accounts(accounts))?;

        info!(account = %account_number, "account modified");
        Ok(())
    }

    /// Remove an account and its credential together.
    ///
    /// A number present in only one store is cleaned out of that store and
    /// the call succeeds; `AccountNotFound` means neither store had it.
    pub fn delete_account(&self, account_number: AccountNumber) -> Result<()> {
        let mut accounts = self.repository.load_accounts()?;
        let mut credentials = self.repository.load_credentials()?;

        let record = accounts.remove(&account_number);
        let credential = credentials.remove(&account_number);

        match (&record, &credential) {
            (None, None) => return Err(BankError::AccountNotFound(account_number)),
            (Some(_), None) => {
                warn!(account = %account_number, "account had no credential entry")
            }
            (None, Some(_)) => {
                warn!(account = %account_number, "credential had no account entry")
            }
            (Some(_), Some(_)) => {}
        }

        let mut changeset = Changeset::new();
        if record.is_some() {
            changeset = changeset.accounts(accounts);
        }
        if credential.is_some() {
            changeset = changeset.credentials(credentials);
        }
        self.repository.commit(changeset)?;

        info!(account = %account_number, "account deleted");
        Ok(())
    }

    /// Snapshot of every record in stored order
    pub fn list_all_accounts(&self) -> Result<Vec<AccountRecord>> {
        Ok(self.repository.load_accounts()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::FileSystemRepository;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> AccountService<FileSystemRepository> {
        let repo = FileSystemRepository::open(temp.path().to_path_buf()).unwrap();
        AccountService::new(repo)
    }

    fn acc(n: u64) -> AccountNumber {
        AccountNumber::new(n)
    }

    #[test]
    fn test_create_then_balance() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let created = service
            .create_account(acc(1001), "Asha", "S", 500, "pw1")
            .unwrap();
        assert_eq!(created, acc(1001));
        assert_eq!(service.get_balance(acc(1001)).unwrap(), 500);

        let record = service.get_account(acc(1001)).unwrap();
        assert_eq!(record.name, "Asha");
        assert_eq!(record.account_type, AccountType::Savings);
    }

    #[test]
    fn test_duplicate_leaves_records_unchanged() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(1), "First", "C", 1000, "a")
            .unwrap();

        let result = service.create_account(acc(1), "Second", "S", 900, "b");
        assert!(matches!(result, Err(BankError::DuplicateAccount(n)) if n == acc(1)));

        let record = service.get_account(acc(1)).unwrap();
        assert_eq!(record.name, "First");
        assert_eq!(record.balance, 1000);
        assert_eq!(service.authenticate(acc(1), "a").unwrap(), AuthResult::Ok);
    }

    #[test]
    fn test_invalid_type_persists_nothing() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let result = service.create_account(acc(5), "X", "X", 5000, "pw");
        assert!(matches!(result, Err(BankError::InvalidAccountType(_))));
        assert!(service.list_all_accounts().unwrap().is_empty());
        assert_eq!(
            service.authenticate(acc(5), "pw").unwrap(),
            AuthResult::NoSuchAccount
        );
    }

    #[test]
    fn test_saving_below_minimum() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let result = service.create_account(acc(5), "Low", "S", 400, "pw");
        assert!(matches!(
            result,
            Err(BankError::InsufficientInitialDeposit { minimum: 500, deposit: 400, .. })
        ));

        let result = service.create_account(acc(6), "Low", "C", 999, "pw");
        assert!(matches!(
            result,
            Err(BankError::InsufficientInitialDeposit { minimum: 1000, .. })
        ));
        assert!(service.list_all_accounts().unwrap().is_empty());
    }

    #[test]
    fn test_overdraw_leaves_balance() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(1), "A", "S", 500, "pw")
            .unwrap();

        let result = service.withdraw(acc(1), 600);
        assert!(matches!(
            result,
            Err(BankError::InsufficientFunds { balance: 500, requested: 600 })
        ));
        assert_eq!(service.get_balance(acc(1)).unwrap(), 500);
    }

    #[test]
    fn test_deposit_withdraw_round_trip() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(1), "A", "C", 1500, "pw")
            .unwrap();

        for amount in [0, 1, 750, 1500] {
            service.deposit(acc(1), amount).unwrap();
            service.withdraw(acc(1), amount).unwrap();
            assert_eq!(service.get_balance(acc(1)).unwrap(), 1500);
        }
    }

    #[test]
    fn test_transaction_on_missing_account() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        assert!(matches!(
            service.deposit(acc(42), 10),
            Err(BankError::AccountNotFound(_))
        ));
        assert!(matches!(
            service.get_balance(acc(42)),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_authenticate_outcomes() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(3), "C", "C", 2000, "secret")
            .unwrap();

        assert_eq!(service.authenticate(acc(3), "secret").unwrap(), AuthResult::Ok);
        assert_eq!(
            service.authenticate(acc(3), "nope").unwrap(),
            AuthResult::WrongPassword
        );
        assert_eq!(
            service.authenticate(acc(4), "secret").unwrap(),
            AuthResult::NoSuchAccount
        );
    }

    #[test]
    fn test_modify_replaces_whole_record() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(8), "Old", "C", 1000, "pw")
            .unwrap();

        // Below the opening minimum is accepted on modify
        service
            .modify_account(acc(8), "New", AccountType::Savings, 10)
            .unwrap();

        let record = service.get_account(acc(8)).unwrap();
        assert_eq!(
            record,
            AccountRecord::new(acc(8), "New".to_string(), AccountType::Savings, 10)
        );
        assert_eq!(service.authenticate(acc(8), "pw").unwrap(), AuthResult::Ok);

        assert!(matches!(
            service.modify_account(acc(9), "Nobody", AccountType::Current, 1),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_list_keeps_creation_order() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        for n in [30, 10, 20] {
            service
                .create_account(acc(n), "N", "S", 500, "pw")
                .unwrap();
        }
        service
            .modify_account(acc(10), "Changed", AccountType::Current, 5)
            .unwrap();

        let numbers: Vec<u64> = service
            .list_all_accounts()
            .unwrap()
            .iter()
            .map(|r| r.account_number.value())
            .collect();
        assert_eq!(numbers, vec![30, 10, 20]);
    }

    #[test]
    fn test_delete_removes_both_halves() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(1), "A", "S", 500, "pw")
            .unwrap();
        service
            .create_account(acc(2), "B", "S", 500, "pw")
            .unwrap();

        service.delete_account(acc(1)).unwrap();

        let remaining = service.list_all_accounts().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].account_number, acc(2));
        assert_eq!(
            service.authenticate(acc(1), "pw").unwrap(),
            AuthResult::NoSuchAccount
        );
        assert!(matches!(
            service.delete_account(acc(1)),
            Err(BankError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_delete_orphan_credential() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);
        service
            .create_account(acc(1), "A", "S", 500, "pw")
            .unwrap();

        // Drop the record half only
        let repo = service.repository();
        let mut accounts = repo.load_accounts().unwrap();
        accounts.remove(&acc(1));
        repo.commit(Changeset::new().accounts(accounts)).unwrap();

        assert!(matches!(
            service.create_account(acc(1), "Again", "S", 500, "pw"),
            Err(BankError::DuplicateAccount(_))
        ));

        service.delete_account(acc(1)).unwrap();
        assert_eq!(
            service.authenticate(acc(1), "pw").unwrap(),
            AuthResult::NoSuchAccount
        );
        service
            .create_account(acc(1), "Again", "S", 500, "pw")
            .unwrap();
    }

    #[test]
    fn test_state_survives_reopen() {
        let temp = TempDir::new().unwrap();
        service(&temp)
            .create_account(acc(77), "Kept", "C", 1200, "pw")
            .unwrap();

        let reopened = service(&temp);
        assert_eq!(reopened.get_balance(acc(77)).unwrap(), 1200);
    }
}
