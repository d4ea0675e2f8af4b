use bankbook::application::{init::init, AccountService};
use bankbook::cli::{format_account_table, Cli, Commands, Menu, Prompter};
use bankbook::error::BankError;
use bankbook::infrastructure::{BankRepository, FileSystemRepository};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Log to stderr so the menu dialogue on stdout stays readable
fn init_tracing() {
    let filter = EnvFilter::try_from_env("BANKBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), BankError> {
    match cli.command {
        Some(Commands::Init {
            path,
            admin_password,
        }) => {
            let root = resolve_root(path.or(cli.data_dir))?;
            let repo = init(&root, admin_password)?;
            println!(
                "Initialized bankbook data directory at {}",
                repo.root().display()
            );
            Ok(())
        }
        Some(Commands::List) => {
            let repo = FileSystemRepository::open_existing(resolve_root(cli.data_dir)?)?;
            let records = AccountService::new(repo).list_all_accounts()?;
            println!("{}", format_account_table(&records).trim_end_matches('\n'));
            Ok(())
        }
        None => {
            let service = open_service(cli.data_dir)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            let prompter = Prompter::new(stdin.lock(), stdout.lock());
            Menu::new(service, prompter).run()
        }
    }
}

fn resolve_root(data_dir: Option<PathBuf>) -> Result<PathBuf, BankError> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => FileSystemRepository::discover_root(),
    }
}

/// The interactive session sets up a missing data directory on first use
fn open_service(data_dir: Option<PathBuf>) -> Result<AccountService<FileSystemRepository>, BankError> {
    let root = resolve_root(data_dir)?;
    Ok(AccountService::new(FileSystemRepository::open(root)?))
}
