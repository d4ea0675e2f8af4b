#![allow(dead_code)]

use assert_cmd::Command;
use bankbook::application::AccountService;
use bankbook::infrastructure::FileSystemRepository;
use std::path::Path;

pub fn bankbook_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bankbook").unwrap();
    cmd.env_remove("BANKBOOK_HOME");
    cmd.env_remove("BANKBOOK_LOG");
    cmd
}

pub fn open_service(root: &Path) -> AccountService<FileSystemRepository> {
    AccountService::new(FileSystemRepository::open(root.to_path_buf()).unwrap())
}
