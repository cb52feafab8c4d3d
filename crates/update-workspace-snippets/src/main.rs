// Copyright 2026 Google LLC

//! Updates the Bazel workspace snippets in the given files to point at the
//! latest commit on the default branch of the repository's GitHub remote.
//!
//! ```text
//! update-workspace-snippets [-C <DIR>] [--url-prefix <PREFIX>] [-v...] <FILE>...
//! ```

use std::process::ExitCode;

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};
use workspace_snippets::UpdateContext;
use workspace_snippets_update::{
    GITHUB_URL_PREFIX, HttpFetcher, Resolver, update_file,
};

#[derive(Parser, Debug)]
#[command(
    name = "update-workspace-snippets",
    version,
    about = "Update Bazel workspace snippets to the latest commit",
    long_about = None,
)]
struct Cli {
    /// Files to update.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<Utf8PathBuf>,

    /// Directory inside the Git repository.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    directory: Utf8PathBuf,

    /// Only remotes with a URL starting with this prefix are considered.
    #[arg(long, value_name = "PREFIX", default_value = GITHUB_URL_PREFIX)]
    url_prefix: String,

    /// Log more; repeat for even more. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = match resolve(&cli) {
        Ok(context) => context,
        Err(error) => {
            error!("{error:#}");
            return ExitCode::FAILURE;
        }
    };

    let failed = update_all(&cli.files, &context);
    if failed > 0 {
        error!(failed, total = cli.files.len(), "some files were not updated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve(cli: &Cli) -> Result<UpdateContext> {
    let resolver = Resolver::new(cli.directory.clone(), cli.url_prefix.clone())?;
    let context = resolver.resolve(&HttpFetcher::new()?)?;
    info!(
        commit = %context.commit(),
        date = %context.date(),
        "resolved latest commit",
    );
    Ok(context)
}

/// Updates every file, logging failures. Returns the number of failures.
fn update_all(files: &[Utf8PathBuf], context: &UpdateContext) -> usize {
    let mut failed = 0;
    for path in files {
        if let Err(error) = update_file(path, context) {
            let error = anyhow::Error::from(error);
            error!("{error:#}");
            failed += 1;
        }
    }
    failed
}
