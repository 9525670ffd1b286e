use std::io;

use anyhow::Result;
use clap::Args;

use super::{open_repo, print_full};
use crate::Cli;

#[derive(Args)]
pub struct ShowArgs {
    /// Commit id, branch or tag
    #[arg(default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &ShowArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    let commit = repo.commit_by_id(&id)?;

    let stdout = io::stdout();
    print_full(&mut stdout.lock(), &commit)?;
    Ok(0)
}
