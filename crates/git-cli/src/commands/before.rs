use anyhow::Result;
use clap::Args;

use super::{open_repo, print_oneline};
use crate::Cli;

#[derive(Args)]
pub struct BeforeArgs {
    /// Commit id, branch or tag
    #[arg(default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &BeforeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    print_oneline(&repo.commits_before(&id.to_hex())?)?;
    Ok(0)
}
