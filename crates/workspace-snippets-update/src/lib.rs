// Copyright 2026 Google LLC

//! Keeps the Bazel workspace snippets in a repository's documentation up to
//! date.
//!
//! This crate connects the pure rewriting in [`workspace_snippets`] to the
//! outside world. A [`Resolver`] finds the repository's GitHub remote, asks
//! it for the commit its default branch points to, and downloads the source
//! archive for that commit to compute its checksums and date. The resulting
//! [`UpdateContext`](workspace_snippets::UpdateContext) is then applied to
//! files with [`update_file`], which replaces them atomically.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use workspace_snippets_update::{
//!     GITHUB_URL_PREFIX, HttpFetcher, Resolver, update_file,
//! };
//!
//! let context = Resolver::new(".", GITHUB_URL_PREFIX)?
//!     .resolve(&HttpFetcher::new()?)?;
//! for path in ["README.md", "MODULE.bazel"] {
//!     let rewritten = update_file(Utf8Path::new(path), &context)?;
//!     println!("{path}: {} stanzas", rewritten.stanzas());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Git
//!
//! Git is run as a subprocess. The `$GIT` environment variable selects the
//! binary, defaulting to `git`. Remote operations run with
//! `GIT_TERMINAL_PROMPT=0`, so they fail instead of prompting.

#![doc(html_root_url = "https://docs.rs/workspace-snippets-update/0.1.0")]
#![deny(missing_docs)]

mod archive;
mod errors;
mod git;
mod resolve;
mod update;

pub use archive::{ArchiveMetadata, Fetcher, HttpFetcher, archive_url};
pub use errors::{
    ArchiveError, AtomicWriteError, FetchError, GitEnvError, GitError,
    ResolveError, UpdateFileError,
};
pub use git::{Git, Remote, read_git_env};
pub use resolve::{GITHUB_URL_PREFIX, Resolver};
pub use update::update_file;
