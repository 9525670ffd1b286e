use anyhow::Result;
use clap::Args;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct CountArgs {
    /// Commit id, branch or tag
    #[arg(default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &CountArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    println!("{}", repo.commits_count(&id.to_hex())?);
    Ok(0)
}
