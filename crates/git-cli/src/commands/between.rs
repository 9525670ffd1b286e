use anyhow::Result;
use clap::Args;

use super::{open_repo, print_oneline};
use crate::Cli;

#[derive(Args)]
pub struct BetweenArgs {
    /// Newest commit, included
    last: String,

    /// First-parent ancestor to stop at, excluded
    before: String,
}

pub fn run(args: &BetweenArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let last = repo.commit_by_id(&repo.resolve_revision(&args.last)?)?;
    let before = repo.commit_by_id(&repo.resolve_revision(&args.before)?)?;
    print_oneline(&repo.commits_between(&last, &before)?)?;
    Ok(0)
}
