//! Line-oriented prompting over any reader/writer pair

use crate::domain::{AccountNumber, AccountType};
use crate::error::{BankError, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Parse a whole, non-negative amount
pub fn parse_amount(input: &str) -> Result<u64> {
    input
        .trim()
        .parse::<u64>()
        .map_err(|_| BankError::InvalidInput(format!("'{}' is not a whole amount", input.trim())))
}

/// Prompts the user and reads answers.
///
/// Every read returns `Ok(None)` once input is exhausted so callers can
/// unwind to the top-level menu and exit.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Write a full line
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).map_err(BankError::Console)
    }

    /// Print `prompt` without a newline and read one line, minus its line ending
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).map_err(BankError::Console)?;
        self.output.flush().map_err(BankError::Console)?;

        // Invalid UTF-8 decodes to replacement characters and fails parsing
        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .map_err(BankError::Console)?;
        if read == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Ask until `parse` accepts the answer, printing `retry` (or the parse
    /// error when `retry` is `None`) after each rejection
    pub fn ask_until<T, F>(&mut self, prompt: &str, retry: Option<&str>, parse: F) -> Result<Option<T>>
    where
        F: Fn(&str) -> Result<T>,
    {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    let message = match retry {
                        Some(retry) => retry.to_string(),
                        None => e.to_string(),
                    };
                    self.say(&message)?;
                }
            }
        }
    }

    pub fn ask_account_number(&mut self, prompt: &str) -> Result<Option<AccountNumber>> {
        self.ask_until(prompt, None, AccountNumber::from_str)
    }

    pub fn ask_amount(&mut self, prompt: &str) -> Result<Option<u64>> {
        self.ask_until(prompt, None, parse_amount)
    }

    pub fn ask_account_type(&mut self, prompt: &str, retry: &str) -> Result<Option<AccountType>> {
        self.ask_until(prompt, Some(retry), AccountType::from_str)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
