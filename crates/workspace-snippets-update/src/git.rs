// Copyright 2026 Google LLC

//! Querying Git repositories and remotes through the `git` binary.

use crate::{GitEnvError, GitError};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Command;
use workspace_snippets::CommitHash;

/// Reads the git binary path from `$GIT`, falling back to `git` if the
/// variable is unset or empty.
///
/// The value is trimmed of leading and trailing whitespace.
///
/// Returns an error if the variable is set but is not valid UTF-8.
pub fn read_git_env() -> Result<String, GitEnvError> {
    const VAR: &str = "GIT";
    match std::env::var(VAR) {
        Ok(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok("git".to_string())
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(std::env::VarError::NotPresent) => Ok("git".to_string()),
        Err(std::env::VarError::NotUnicode(value)) => {
            Err(GitEnvError::NonUtf8 { var: VAR, value })
        }
    }
}

/// A remote of a Git repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remote {
    name: String,
    urls: Vec<String>,
}

impl Remote {
    /// Creates a remote with the given name and URLs.
    pub fn new(name: impl Into<String>, urls: Vec<String>) -> Self {
        Remote { name: name.into(), urls }
    }

    /// Returns the name of the remote, e.g. `origin`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured URLs of the remote, in order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Returns the first URL that starts with `prefix`, if any.
    pub fn matching_url(&self, prefix: &str) -> Option<&str> {
        self.urls
            .iter()
            .map(String::as_str)
            .find(|url| url.starts_with(prefix))
    }
}

/// The `git` command-line tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Git {
    binary: String,
}

impl Git {
    /// Uses the `$GIT` environment variable or `"git"`.
    ///
    /// Returns an error if the `$GIT` environment variable is set but is not
    /// valid UTF-8.
    pub fn from_env() -> Result<Self, GitEnvError> {
        Ok(Git { binary: read_git_env()? })
    }

    /// Uses the given binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Git { binary: binary.into() }
    }

    /// Returns the path to the git binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Returns the root of the working tree containing `dir`.
    ///
    /// `dir` may be anywhere inside the working tree.
    pub fn repo_root(&self, dir: &Utf8Path) -> Result<Utf8PathBuf, GitError> {
        let args = ["rev-parse", "--show-toplevel"];
        let stdout = self.run(dir, &args)?;
        let root = stdout.trim();
        if root.is_empty() {
            return Err(GitError::UnexpectedOutput {
                command: args.join(" "),
                stdout,
            });
        }
        Ok(Utf8PathBuf::from(root))
    }

    /// Lists the remotes configured for the repository at `repo_root`, in
    /// configuration order.
    pub fn remotes(&self, repo_root: &Utf8Path) -> Result<Vec<Remote>, GitError> {
        let args = ["config", "--get-regexp", r"^remote\..*\.url$"];
        let stdout = match self.run(repo_root, &args) {
            Ok(stdout) => stdout,
            // `git config --get-regexp` exits with status 1 if nothing
            // matches.
            Err(GitError::GitFailed { exit_status, stderr, .. })
                if exit_status.ends_with(" 1") && stderr.is_empty() =>
            {
                String::new()
            }
            Err(error) => return Err(error),
        };
        parse_remotes(&stdout).ok_or_else(|| GitError::UnexpectedOutput {
            command: args.join(" "),
            stdout: stdout.clone(),
        })
    }

    /// Returns the hash of the commit the remote `HEAD` (its default branch)
    /// points to, or `None` if the remote has no `HEAD`.
    ///
    /// This contacts the remote.
    pub fn default_branch_head(
        &self,
        repo_root: &Utf8Path,
        url: &str,
    ) -> Result<Option<CommitHash>, GitError> {
        let args = ["ls-remote", "--symref", url, "HEAD"];
        let stdout = self.run(repo_root, &args)?;
        parse_head(&stdout).map_err(|()| GitError::UnexpectedOutput {
            command: args.join(" "),
            stdout: stdout.clone(),
        })
    }

    fn run(&self, dir: &Utf8Path, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new(&self.binary)
            .current_dir(dir)
            .args(args)
            // Never wait for credentials on a terminal.
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|source| GitError::SpawnFailed {
                binary_path: self.binary.clone(),
                dir: dir.to_owned(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::GitFailed {
                command: args.join(" "),
                exit_status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|error| {
            GitError::UnexpectedOutput {
                command: args.join(" "),
                stdout: String::from_utf8_lossy(error.as_bytes()).into_owned(),
            }
        })
    }
}

/// Parses the output of `git config --get-regexp '^remote\..*\.url$'`.
///
/// Each line is `remote.<name>.url <url>`. Remote names may contain dots.
fn parse_remotes(stdout: &str) -> Option<Vec<Remote>> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let (key, url) = line.split_once(' ')?;
        let name = key.strip_prefix("remote.")?.strip_suffix(".url")?;
        match remotes.iter_mut().find(|r| r.name == name) {
            Some(remote) => remote.urls.push(url.to_owned()),
            None => remotes.push(Remote::new(name, vec![url.to_owned()])),
        }
    }
    Some(remotes)
}

/// Parses the output of `git ls-remote --symref <url> HEAD`:
///
/// ```text
/// ref: refs/heads/main	HEAD
/// 0123456789abcdef0123456789abcdef01234567	HEAD
/// ```
fn parse_head(stdout: &str) -> Result<Option<CommitHash>, ()> {
    for line in stdout.lines() {
        let Some((value, name)) = line.split_once('\t') else {
            continue;
        };
        if name != "HEAD" || value.starts_with("ref: ") {
            continue;
        }
        return value.parse().map(Some).map_err(|_| ());
    }
    Ok(None)
}
