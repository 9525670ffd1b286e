use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use git_ref::Reference;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct RefsArgs {
    /// Only refs starting with this prefix, e.g. `refs/tags/`
    prefix: Option<String>,
}

pub fn run(args: &RefsArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let refs = repo.refs().list(args.prefix.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for r in &refs {
        match r {
            Reference::Direct { name, target } => writeln!(out, "{target} {name}")?,
            Reference::Symbolic { name, target } => {
                let oid = repo.refs().resolve_to_oid(name)?;
                writeln!(out, "{oid} {name} -> {target}")?;
            }
        }
    }
    Ok(if refs.is_empty() { 1 } else { 0 })
}
