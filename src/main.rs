#![deny(clippy::mod_module_files)]
use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod branches;
mod cleanup;
mod config;
mod error;
mod git;
mod logging;
mod squash;

use config::Settings;
use git::CommandGit;

#[derive(Parser)]
#[command(
    name = "git-delete-squashed",
    version,
    about = "Delete local branches that have been squash-merged into a reference branch"
)]
struct Cli {
    /// Reference branch
    ///
    /// Falls back to $DEFAULT_BRANCH_NAME, then `.gds` or `.git-delete-squashed`, then master
    branch: Option<String>,
    /// Run as if started in PATH
    #[arg(short = 'C', long = "repo", value_name = "PATH", default_value = ".")]
    repo: PathBuf,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Whole cause chain on one line
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.branch, cli.repo);
    let git = Arc::new(CommandGit::new(&settings.repo_dir));

    let stdout = io::stdout();
    let mut output = stdout.lock();
    cleanup::run(git, &settings, &mut output)?;

    Ok(())
}
