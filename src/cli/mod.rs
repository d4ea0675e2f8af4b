//! CLI layer - Command-line interface

pub mod commands;
pub mod menu;
pub mod output;
pub mod prompt;

pub use commands::{Cli, Commands};
pub use menu::Menu;
pub use output::{format_account_table, format_amount, format_error};
pub use prompt::Prompter;
