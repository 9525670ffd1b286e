pub mod before;
pub mod between;
pub mod count;
pub mod file_count;
pub mod last_change;
pub mod log;
pub mod refs;
pub mod search;
pub mod show;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use bstr::ByteSlice;
use clap::Subcommand;
use git_history::{Commit, Repository};
use tracing::debug;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Show one commit in full
    Show(show::ShowArgs),
    /// Count commits reachable from a revision
    Count(count::CountArgs),
    /// Count commits on a branch that changed a path
    FileCount(file_count::FileCountArgs),
    /// List one page of history
    Log(log::LogArgs),
    /// List one page of the commits on a branch that changed a path
    FileLog(log::FileLogArgs),
    /// Search commit messages with a case-insensitive pattern
    Search(search::SearchArgs),
    /// List all ancestors, merged branches interleaved by commit time
    Before(before::BeforeArgs),
    /// List first-parent commits from one commit down to another
    Between(between::BetweenArgs),
    /// Show the last commit that changed a path
    LastChange(last_change::LastChangeArgs),
    /// List references and their targets
    Refs(refs::RefsArgs),
}

pub fn open_repo(cli: &Cli) -> Result<Repository> {
    let repo = if let Some(ref git_dir) = cli.git_dir {
        Repository::open(git_dir)?
    } else {
        Repository::discover(".")?
    };
    debug!(git_dir = %repo.git_dir().display(), "opened repository");
    Ok(repo)
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Show(args) => show::run(args, &cli),
        Commands::Count(args) => count::run(args, &cli),
        Commands::FileCount(args) => file_count::run(args, &cli),
        Commands::Log(args) => log::run(args, &cli),
        Commands::FileLog(args) => log::run_file(args, &cli),
        Commands::Search(args) => search::run(args, &cli),
        Commands::Before(args) => before::run(args, &cli),
        Commands::Between(args) => between::run(args, &cli),
        Commands::LastChange(args) => last_change::run(args, &cli),
        Commands::Refs(args) => refs::run(args, &cli),
    }
}

/// `<id> <summary>` per commit.
pub fn print_oneline(commits: &[Arc<Commit>]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for commit in commits {
        writeln!(out, "{} {}", commit.id(), commit.summary())?;
    }
    Ok(())
}

/// Header block and indented message, like `git show --no-patch`.
pub fn print_full(out: &mut impl Write, commit: &Commit) -> Result<()> {
    writeln!(out, "commit {}", commit.id())?;
    if commit.is_merge() {
        let short: Vec<String> = commit
            .parent_ids()
            .iter()
            .map(|p| p.to_hex()[..7].to_string())
            .collect();
        writeln!(out, "Merge: {}", short.join(" "))?;
    }
    let author = commit.author();
    writeln!(out, "Author: {} <{}>", author.name, author.email)?;
    let date = author
        .date
        .to_datetime()
        .map(|d| d.format("%a %b %e %H:%M:%S %Y %z").to_string())
        .unwrap_or_else(|| author.date.timestamp.to_string());
    writeln!(out, "Date:   {date}")?;
    writeln!(out)?;
    for line in commit.message().lines() {
        writeln!(out, "    {}", line.as_bstr())?;
    }
    Ok(())
}
