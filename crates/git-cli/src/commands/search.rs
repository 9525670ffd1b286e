use anyhow::Result;
use clap::Args;

use super::{open_repo, print_oneline};
use crate::Cli;

#[derive(Args)]
pub struct SearchArgs {
    /// Regular expression matched against commit messages, ignoring case
    keyword: String,

    /// Commit id, branch or tag to search from
    #[arg(default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &SearchArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    let hits = repo.search_commits(&id.to_hex(), &args.keyword)?;
    print_oneline(&hits)?;
    Ok(if hits.is_empty() { 1 } else { 0 })
}
