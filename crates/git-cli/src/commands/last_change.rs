use anyhow::Result;
use clap::Args;

use super::{open_repo, print_oneline};
use crate::Cli;

#[derive(Args)]
pub struct LastChangeArgs {
    /// Path relative to the repository root
    path: String,

    /// Commit id, branch or tag to look back from
    #[arg(default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &LastChangeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let id = repo.resolve_revision(&args.rev)?;
    match repo.commit_of_rel_path(&id.to_hex(), &args.path)? {
        Some(commit) => {
            print_oneline(&[commit])?;
            Ok(0)
        }
        None => {
            eprintln!("no commit at or before {} changed '{}'", args.rev, args.path);
            Ok(1)
        }
    }
}
