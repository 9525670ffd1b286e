use anyhow::Result;
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct FileCountArgs {
    /// Branch name (without `refs/heads/`)
    branch: String,

    /// Path relative to the repository root
    path: String,
}

pub fn run(args: &FileCountArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    println!("{}", repo.file_commits_count(&args.branch, &args.path)?);
    Ok(0)
}
