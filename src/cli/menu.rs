//! Interactive login, admin and user menus

use crate::application::AccountService;
use crate::cli::output::{format_account_table, format_amount, format_error};
use crate::cli::prompt::Prompter;
use crate::domain::{AccountNumber, AccountType, AuthResult, TransactionKind};
use crate::error::{BankError, Result};
use crate::infrastructure::BankRepository;
use std::io::{BufRead, Write};
use tracing::debug;

/// Whether the session goes on after a menu step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Menu-driven console session over an [`AccountService`]
pub struct Menu<Repo: BankRepository, R, W> {
    service: AccountService<Repo>,
    io: Prompter<R, W>,
}

impl<Repo: BankRepository, R: BufRead, W: Write> Menu<Repo, R, W> {
    pub fn new(service: AccountService<Repo>, io: Prompter<R, W>) -> Self {
        Menu { service, io }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.io
    }

    /// Run the login menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.io.say("\n========= LOGIN MENU =========")?;
            self.io.say("1. Admin")?;
            self.io.say("2. Existing User")?;
            self.io.say("3. New User")?;
            self.io.say("4. Exit")?;
            self.io.say("===============================")?;

            let Some(choice) = self.io.ask("Choose an option: ")? else {
                break;
            };

            let flow = match choice.trim() {
                "1" => self.admin_login()?,
                "2" => self.existing_user()?,
                "3" => self.new_user()?,
                "4" => Flow::Exit,
                _ => {
                    self.io.say("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        self.io.say("Thank you for using the Bank Management System.")
    }

    /// Print a refused request and carry on; storage failures end the session
    fn report(&mut self, err: BankError) -> Result<()> {
        if err.is_storage() {
            return Err(err);
        }
        debug!(error = %err, "request refused");
        self.io.say(&format_error(&err))
    }

    fn amount(&self, amount: u64) -> String {
        format_amount(&self.service.repository().config().currency, amount)
    }

    fn admin_login(&mut self) -> Result<Flow> {
        let Some(password) = self.io.ask("Enter admin password: ")? else {
            return Ok(Flow::Exit);
        };

        if password == self.service.repository().config().admin_password {
            self.admin_menu()
        } else {
            self.io.say("Wrong password.")?;
            Ok(Flow::Continue)
        }
    }

    fn admin_menu(&mut self) -> Result<Flow> {
        loop {
            self.io.say("\n-- ADMIN MENU --")?;
            self.io.say("1. View All Account Holders")?;
            self.io.say("2. Modify Account")?;
            self.io.say("3. Close Account")?;
            self.io.say("4. Logout")?;

            let Some(choice) = self.io.ask("Choose an option: ")? else {
                return Ok(Flow::Exit);
            };

            match choice.trim() {
                "1" => match self.service.list_all_accounts() {
                    Ok(records) => {
                        let table = format_account_table(&records);
                        self.io.say(table.trim_end_matches('\n'))?;
                    }
                    Err(e) => self.report(e)?,
                },
                "2" => {
                    if self.modify_account()? == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                }
                // Closing an account also logs the admin out
                "3" => return self.close_account(),
                "4" => return Ok(Flow::Continue),
                _ => self.io.say("Invalid choice.")?,
            }
        }
    }

    fn modify_account(&mut self) -> Result<Flow> {
        let Some(account_number) = self
            .io
            .ask_account_number("Enter account number to modify: ")?
        else {
            return Ok(Flow::Exit);
        };

        if let Err(e) = self.service.get_account(account_number) {
            self.report(e)?;
            return Ok(Flow::Continue);
        }

        let Some(name) = self.io.ask("Enter new name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(account_type) = self
            .io
            .ask_account_type("Enter new type [C/S]: ", "Invalid type! Use C or S.")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(balance) = self.io.ask_amount("Enter new balance: ")? else {
            return Ok(Flow::Exit);
        };

        match self
            .service
            .modify_account(account_number, &name, account_type, balance)
        {
            Ok(()) => self.io.say("Account updated.")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn close_account(&mut self) -> Result<Flow> {
        let Some(account_number) = self
            .io
            .ask_account_number("Enter account number to delete: ")?
        else {
            return Ok(Flow::Exit);
        };

        match self.service.delete_account(account_number) {
            Ok(()) => self.io.say("Account deleted.")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn existing_user(&mut self) -> Result<Flow> {
        let Some(account_number) = self.io.ask_account_number("Enter your account number: ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.io.ask("Enter your password: ")? else {
            return Ok(Flow::Exit);
        };

        let result = match self.service.authenticate(account_number, &password) {
            Ok(result) => result,
            Err(e) => {
                self.report(e)?;
                return Ok(Flow::Continue);
            }
        };

        match result {
            AuthResult::Ok => self.user_menu(account_number),
            failed => {
                if let Err(e) = failed.into_result(account_number) {
                    self.report(e)?;
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn new_user(&mut self) -> Result<Flow> {
        let Some(account_number) = self
            .io
            .ask_account_number("Enter desired account number: ")?
        else {
            return Ok(Flow::Exit);
        };

        if let Err(e) = self.service.ensure_available(account_number) {
            self.report(e)?;
            return Ok(Flow::Continue);
        }

        let Some(name) = self.io.ask("Enter your name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(account_type) = self.io.ask_account_type(
            "Enter account type [C/S]: ",
            "Invalid type! Choose 'C' for Current or 'S' for Saving.",
        )?
        else {
            return Ok(Flow::Exit);
        };
        let deposit = loop {
            let Some(deposit) = self.io.ask_amount("Enter initial deposit: ")? else {
                return Ok(Flow::Exit);
            };
            if account_type.check_opening_deposit(deposit).is_ok() {
                break deposit;
            }
            let line = format!(
                "Minimum {} for Saving and {} for Current.",
                self.amount(AccountType::Savings.minimum_opening_deposit()),
                self.amount(AccountType::Current.minimum_opening_deposit())
            );
            self.io.say(&line)?;
        };
        let Some(password) = self.io.ask("Set a password for your account: ")? else {
            return Ok(Flow::Exit);
        };

        match self.service.create_account(
            account_number,
            &name,
            account_type.code(),
            deposit,
            &password,
        ) {
            Ok(account_number) => {
                self.io.say("\nAccount created successfully!")?;
                self.user_menu(account_number)
            }
            Err(e) => {
                self.report(e)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn user_menu(&mut self, account_number: AccountNumber) -> Result<Flow> {
        loop {
            self.io.say("\n-- USER MENU --")?;
            self.io.say("1. Deposit")?;
            self.io.say("2. Withdraw")?;
            self.io.say("3. Balance Enquiry")?;
            self.io.say("4. Logout")?;

            let Some(choice) = self.io.ask("Choose an option: ")? else {
                return Ok(Flow::Exit);
            };

            let flow = match choice.trim() {
                "1" => self.transact(account_number, TransactionKind::Deposit)?,
                "2" => self.transact(account_number, TransactionKind::Withdraw)?,
                "3" => {
                    match self.service.get_balance(account_number) {
                        Ok(balance) => {
                            let line = format!("Available balance: {}", self.amount(balance));
                            self.io.say(&line)?;
                        }
                        Err(e) => self.report(e)?,
                    }
                    Flow::Continue
                }
                "4" => return Ok(Flow::Continue),
                _ => {
                    self.io.say("Invalid choice.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn transact(&mut self, account_number: AccountNumber, kind: TransactionKind) -> Result<Flow> {
        if let Err(e) = self.service.get_account(account_number) {
            self.report(e)?;
            return Ok(Flow::Continue);
        }

        let prompt = format!("Enter amount to {}: ", kind.verb());
        let Some(amount) = self.io.ask_amount(&prompt)? else {
            return Ok(Flow::Exit);
        };

        match self.service.apply_transaction(account_number, kind, amount) {
            Ok(balance) => {
                let label = match kind {
                    TransactionKind::Deposit => "Deposit",
                    TransactionKind::Withdraw => "Withdraw",
                };
                let line = format!(
                    "{} successful. New balance: {}",
                    label,
                    self.amount(balance)
                );
                self.io.say(&line)?;
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::FileSystemRepository;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Run a scripted session and return everything printed
    fn run_session(temp: &TempDir, script: &str) -> String {
        let repo = FileSystemRepository::open(temp.path().to_path_buf()).unwrap();
        let io = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut menu = Menu::new(AccountService::new(repo), io);
        menu.run().unwrap();
        String::from_utf8(menu.into_prompter().into_output()).unwrap()
    }

    fn service(temp: &TempDir) -> AccountService<FileSystemRepository> {
        AccountService::new(FileSystemRepository::open(temp.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_exit_immediately() {
        let temp = TempDir::new().unwrap();
        let out = run_session(&temp, "4\n");
        assert!(out.contains("LOGIN MENU"));
        assert!(out.ends_with("Thank you for using the Bank Management System.\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let temp = TempDir::new().unwrap();
        let out = run_session(&temp, "3\n1001\n");
        assert!(out.contains("Enter your name: "));
        assert!(out.contains("Thank you for using the Bank Management System."));
    }

    #[test]
    fn test_new_user_full_flow() {
        let temp = TempDir::new().unwrap();
        let script = "3\n1001\nAsha\nx\ns\n400\nfive\n500\npw1\n\
                      2\n600\n1\n100\n3\n4\n4\n";
        let out = run_session(&temp, script);

        assert!(out.contains("Invalid type! Choose 'C' for Current or 'S' for Saving."));
        assert!(out.contains("Minimum ₹500 for Saving and ₹1000 for Current."));
        assert!(out.contains("'five' is not a whole amount"));
        assert!(out.contains("Account created successfully!"));
        assert!(out.contains("!! Insufficient funds."));
        assert!(out.contains("Deposit successful. New balance: ₹600"));
        assert!(out.contains("Available balance: ₹600"));

        assert_eq!(service(&temp).get_balance(AccountNumber::new(1001)).unwrap(), 600);
    }

    #[test]
    fn test_new_user_duplicate_number() {
        let temp = TempDir::new().unwrap();
        service(&temp)
            .create_account(AccountNumber::new(5), "A", "C", 1000, "pw")
            .unwrap();

        let out = run_session(&temp, "3\n5\n4\n");
        assert!(out.contains("Account number already exists."));
        assert!(!out.contains("Enter your name: "));
    }

    #[test]
    fn test_existing_user_login_outcomes() {
        let temp = TempDir::new().unwrap();
        service(&temp)
            .create_account(AccountNumber::new(5), "A", "C", 1000, "pw")
            .unwrap();

        let out = run_session(&temp, "2\n5\nbad\n2\n6\npw\n2\nabc\n5\npw\n3\n4\n4\n");
        assert!(out.contains("Incorrect Password"));
        assert!(out.contains("No such account found"));
        assert!(out.contains("'abc' is not an account number"));
        assert!(out.contains("Available balance: ₹1000"));
    }

    #[test]
    fn test_admin_wrong_password() {
        let temp = TempDir::new().unwrap();
        let out = run_session(&temp, "1\nguess\n4\n");
        assert!(out.contains("Wrong password."));
        assert!(!out.contains("ADMIN MENU"));
    }

    #[test]
    fn test_admin_list_modify_close() {
        let temp = TempDir::new().unwrap();
        let svc = service(&temp);
        svc.create_account(AccountNumber::new(1), "One", "C", 1000, "a")
            .unwrap();
        svc.create_account(AccountNumber::new(2), "Two", "S", 500, "b")
            .unwrap();

        let script = "1\nadmin123\n1\n2\n9\n2\n1\nUno\nq\ns\n50\n3\n2\n4\n";
        let out = run_session(&temp, script);

        assert!(out.contains("AccNo"));
        assert!(out.contains("Account not found."));
        assert!(out.contains("Invalid type! Use C or S."));
        assert!(out.contains("Account updated."));
        assert!(out.contains("Account deleted."));

        let records = svc.list_all_accounts().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Uno");
        assert_eq!(records[0].balance, 50);
        assert_eq!(
            svc.authenticate(AccountNumber::new(2), "b").unwrap(),
            AuthResult::NoSuchAccount
        );
    }

    #[test]
    fn test_admin_list_empty() {
        let temp = TempDir::new().unwrap();
        let out = run_session(&temp, "1\nadmin123\n1\n4\n4\n");
        assert!(out.contains("No accounts found."));
    }

    #[test]
    fn test_invalid_utf8_input_keeps_session_alive() {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::open(temp.path().to_path_buf()).unwrap();
        let script = b"\xff\n3\n\xfe\n1001\nAsha\nS\n500\npw\n4\n4\n".to_vec();
        let io = Prompter::new(Cursor::new(script), Vec::new());
        let mut menu = Menu::new(AccountService::new(repo), io);
        menu.run().unwrap();

        let out = String::from_utf8(menu.into_prompter().into_output()).unwrap();
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("is not an account number"));
        assert!(out.contains("Account created successfully!"));
        assert!(out.ends_with("Thank you for using the Bank Management System.\n"));
    }

    #[test]
    fn test_corrupt_store_ends_session_with_error() {
        let temp = TempDir::new().unwrap();
        service(&temp)
            .create_account(AccountNumber::new(5), "A", "C", 1000, "pw")
            .unwrap();
        std::fs::write(temp.path().join(".bankbook/accounts.bin"), [0xff]).unwrap();

        let repo = FileSystemRepository::open(temp.path().to_path_buf()).unwrap();
        let io = Prompter::new(Cursor::new(b"2\n5\npw\n3\n4\n4\n".to_vec()), Vec::new());
        let mut menu = Menu::new(AccountService::new(repo), io);

        match menu.run() {
            Err(BankError::CorruptStore { path, .. }) => {
                assert!(path.ends_with("accounts.bin"));
            }
            other => panic!("Expected CorruptStore, got {:?}", other),
        }
        let out = String::from_utf8(menu.into_prompter().into_output()).unwrap();
        assert!(out.contains("USER MENU"));
        assert!(!out.contains("Available balance"));
        assert!(!out.contains("Thank you for using the Bank Management System."));
    }

    #[test]
    fn test_invalid_choices() {
        let temp = TempDir::new().unwrap();
        let out = run_session(&temp, "9\n1\nadmin123\n7\n4\n4\n");
        assert!(out.contains("Invalid choice. Please try again."));
        assert!(out.contains("Invalid choice.\n"));
    }
}
