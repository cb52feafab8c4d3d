// Copyright 2026 Google LLC

//! Error types for remote resolution and file updates.

use camino::Utf8PathBuf;
use std::{ffi::OsString, io};
use thiserror::Error;
use workspace_snippets::{DateParseError, RewriteError};

// ---- Git errors ----

/// An error from reading the git binary path from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitEnvError {
    /// The environment variable is set but is not valid UTF-8.
    #[error(
        "${var} environment variable is not valid \
         UTF-8: {value:?}"
    )]
    NonUtf8 {
        /// The environment variable name.
        var: &'static str,
        /// The non-UTF-8 value.
        value: OsString,
    },
}

/// An error from running git.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GitError {
    /// Failed to spawn the git process.
    #[error("failed to run git at {binary_path:?} in {dir}")]
    SpawnFailed {
        /// The path to the git executable.
        binary_path: String,
        /// The working directory where the command was run.
        dir: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The git command failed.
    #[error("`git {command}` failed ({exit_status}): {stderr}")]
    GitFailed {
        /// The git subcommand and its arguments.
        command: String,
        /// A human-readable description of the exit status (e.g.,
        /// "exit status: 128" or "signal: 9").
        exit_status: String,
        /// The stderr output from git.
        stderr: String,
    },

    /// The git command succeeded but returned output that couldn't be
    /// interpreted.
    #[error("`git {command}` returned unexpected output: {stdout:?}")]
    UnexpectedOutput {
        /// The git subcommand and its arguments.
        command: String,
        /// The stdout content that could not be interpreted.
        stdout: String,
    },
}

// ---- Archive errors ----

/// An error that occurs while downloading an archive.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the response body could not be
    /// read.
    #[error("failed to download {url}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a status other than 200 OK.
    #[error("downloading {url} resulted in HTTP status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status, e.g. "404 Not Found".
        status: String,
    },
}

/// An error that occurs while inspecting a downloaded archive.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The archive is not a valid zip file.
    #[error("invalid zip archive")]
    Zip(#[from] zip::result::ZipError),

    /// The archive has no top-level directory entry.
    #[error("archive has no top-level directory entry")]
    NoRootDirectory,

    /// The archive has more than one top-level directory entry.
    #[error("archive has several top-level directory entries: {0:?}")]
    MultipleRootDirectories(Vec<String>),

    /// The top-level directory entry has no modification time.
    #[error("top-level directory {name:?} has no modification time")]
    NoTimestamp {
        /// The entry name.
        name: String,
    },

    /// The modification time of the top-level directory is not a valid
    /// date.
    #[error("top-level directory {name:?} has an invalid modification time")]
    InvalidTimestamp {
        /// The entry name.
        name: String,
        /// The underlying error.
        #[source]
        error: DateParseError,
    },
}

// ---- Resolution errors ----

/// An error that occurs while resolving the update context for a
/// repository.
///
/// All of these are fatal: no file should be touched if resolution fails.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The URL prefix is empty.
    #[error("empty URL prefix")]
    EmptyUrlPrefix,

    /// The directory is empty.
    #[error("empty directory")]
    EmptyDirectory,

    /// The `$GIT` environment variable is invalid.
    #[error(transparent)]
    GitEnv(#[from] GitEnvError),

    /// The directory is not inside a Git repository.
    #[error("can't open Git repository in {dir}")]
    OpenRepository {
        /// The directory that was searched.
        dir: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: GitError,
    },

    /// The remotes of the repository could not be listed.
    #[error("can't list remotes of Git repository in {repo_root}")]
    ListRemotes {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: GitError,
    },

    /// No remote URL starts with the URL prefix.
    #[error("no remote matching {url_prefix} for Git repository in {repo_root}")]
    NoMatchingRemote {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The URL prefix.
        url_prefix: String,
    },

    /// More than one remote has a URL starting with the URL prefix.
    #[error(
        "multiple remotes matching {url_prefix} for Git repository in \
         {repo_root}: {first} and {second}"
    )]
    MultipleMatchingRemotes {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The URL prefix.
        url_prefix: String,
        /// The name of the first matching remote.
        first: String,
        /// The name of the second matching remote.
        second: String,
    },

    /// The references of the remote could not be listed.
    #[error("can't list references of remote {url}")]
    ListReferences {
        /// The remote URL.
        url: String,
        /// The underlying error.
        #[source]
        error: GitError,
    },

    /// The remote has no default branch (`HEAD`).
    #[error("no default branch reference found in remote {url}")]
    NoDefaultBranch {
        /// The remote URL.
        url: String,
    },

    /// The archive could not be downloaded.
    #[error("can't download archive for Git repository in {repo_root}")]
    Fetch {
        /// The repository root.
        repo_root: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: FetchError,
    },

    /// The downloaded archive could not be inspected.
    #[error("can't inspect archive {url}")]
    Archive {
        /// The archive URL.
        url: String,
        /// The underlying error.
        #[source]
        error: ArchiveError,
    },
}

// ---- File update errors ----

/// Errors that can occur while updating a single file.
///
/// These only affect the file in question; other files can still be
/// updated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UpdateFileError {
    /// Failed to read the file.
    #[error("can't read file {path}")]
    Read {
        /// The path to the file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The file has no stanzas or a malformed one.
    #[error("can't update file {path}")]
    Rewrite {
        /// The path to the file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: RewriteError,
    },

    /// Failed to write the updated file.
    #[error("can't write updated file {path}")]
    Write {
        /// The path where the write failed.
        path: Utf8PathBuf,
        /// The underlying write error.
        #[source]
        error: AtomicWriteError,
    },
}

/// An error that occurred during an atomic file write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtomicWriteError {
    /// Writing contents to the temporary file failed.
    #[error("writing file contents failed")]
    Write(#[source] io::Error),

    /// The atomic write infrastructure failed (e.g., creating the
    /// temporary file, or renaming it into place).
    #[error("atomic create or rename failed")]
    Rename(#[source] io::Error),
}
