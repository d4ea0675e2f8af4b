//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bankbook")]
#[command(about = "Console bank account manager", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the .bankbook data (default: $BANKBOOK_HOME or the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory with empty account stores
    Init {
        /// Directory to initialize (default: --data-dir or the current directory)
        path: Option<PathBuf>,

        /// Password for the admin menu (default: admin123)
        #[arg(long)]
        admin_password: Option<String>,
    },

    /// Print every account holder and exit
    List,
}
