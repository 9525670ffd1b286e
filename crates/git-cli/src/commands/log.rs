use anyhow::Result;
use clap::Args;

use super::{open_repo, print_oneline};
use crate::Cli;

#[derive(Args)]
pub struct LogArgs {
    /// Commit id, branch or tag
    #[arg(default_value = "HEAD")]
    rev: String,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args)]
pub struct FileLogArgs {
    /// Branch name (without `refs/heads/`)
    branch: String,

    /// Path relative to the repository root
    path: String,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

pub fn run(args: &LogArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    print_oneline(&repo.commits_by_range(&id.to_hex(), args.page)?)?;
    Ok(0)
}

pub fn run_file(args: &FileLogArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let commits = repo.commits_by_file_and_range(&args.branch, &args.path, args.page)?;
    print_oneline(&commits)?;
    Ok(0)
}
