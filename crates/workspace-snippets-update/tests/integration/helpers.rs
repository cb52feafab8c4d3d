// Copyright 2026 Google LLC

//! Test helpers: throwaway repositories with a local "remote" and archives
//! laid out like GitHub serves them.

use anyhow::Result;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use std::{
    fs,
    io::{Cursor, Write},
    process::Command,
};
use workspace_snippets::{CommitHash, SnippetDate};
use workspace_snippets_update::{FetchError, Fetcher};
use zip::{DateTime, ZipWriter, write::SimpleFileOptions};

/// Returns a `Command` for git, respecting the `$GIT` environment variable.
pub fn git_command() -> Command {
    let bin = std::env::var("GIT").unwrap_or_else(|_| "git".to_string());
    Command::new(bin)
}

/// Runs git in `dir` and returns its trimmed standard output.
pub fn git(dir: &Utf8Path, args: &[&str]) -> Result<String> {
    let output = git_command().args(args).current_dir(dir).output()?;
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Writes content to a file atomically.
pub fn write_file(
    path: impl AsRef<Utf8Path>,
    content: impl AsRef<[u8]>,
) -> std::io::Result<()> {
    let path = path.as_ref();
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(content.as_ref()))
        .map_err(|e| e.into())
}

/// A working tree with a bare repository as its `origin` remote.
pub struct Fixture {
    // Kept alive so the directory isn't removed early.
    temp: Utf8TempDir,
    worktree: Utf8PathBuf,
    remote: Utf8PathBuf,
}

impl Fixture {
    /// Creates the remote, whose `HEAD` points to `main`, and a working tree
    /// with `origin` set to it. Nothing is committed yet.
    pub fn new() -> Result<Self> {
        let temp = Utf8TempDir::with_prefix("workspace-snippets-update-")?;
        let remote = temp.path().join("remote.git");
        git(
            temp.path(),
            &["init", "--bare", "--initial-branch=main", remote.as_str()],
        )?;

        let worktree = temp.path().join("work");
        fs::create_dir_all(&worktree)?;
        git(&worktree, &["init"])?;
        git(&worktree, &["config", "user.email", "test@example.com"])?;
        git(&worktree, &["config", "user.name", "Test User"])?;
        git(&worktree, &["config", "commit.gpgsign", "false"])?;
        git(&worktree, &["remote", "add", "origin", remote.as_str()])?;

        Ok(Fixture { temp, worktree, remote })
    }

    /// Like [`Fixture::new`], but also commits a file and pushes it to
    /// `main`. Returns the commit.
    pub fn with_commit() -> Result<(Self, CommitHash)> {
        let fixture = Fixture::new()?;
        let commit = fixture.commit("README.md", "# Example\n")?;
        fixture.push(commit, "main")?;
        Ok((fixture, commit))
    }

    /// The temporary directory everything lives in.
    pub fn root(&self) -> &Utf8Path {
        self.temp.path()
    }

    pub fn worktree(&self) -> &Utf8Path {
        &self.worktree
    }

    /// The URL of `origin`, a local path.
    pub fn remote_url(&self) -> &str {
        self.remote.as_str()
    }

    /// Writes and commits a file in the working tree.
    pub fn commit(&self, name: &str, contents: &str) -> Result<CommitHash> {
        write_file(self.worktree.join(name), contents)?;
        git(&self.worktree, &["add", name])?;
        git(&self.worktree, &["commit", "-m", &format!("Update {name}")])?;
        Ok(git(&self.worktree, &["rev-parse", "HEAD"])?.parse()?)
    }

    /// Pushes `commit` to `branch` of `origin`.
    pub fn push(&self, commit: CommitHash, branch: &str) -> Result<()> {
        let refspec = format!("{commit}:refs/heads/{branch}");
        git(&self.worktree, &["push", "origin", &refspec])?;
        Ok(())
    }

    /// Writes the archive of `commit` where [`LocalFetcher`] finds it, and
    /// returns its contents.
    pub fn publish_archive(
        &self,
        commit: CommitHash,
        date: SnippetDate,
    ) -> Result<Vec<u8>> {
        let dir = self.root().join("remote").join("archive");
        fs::create_dir_all(&dir)?;
        let contents = build_archive(commit, date)?;
        write_file(dir.join(format!("{commit}.zip")), &contents)?;
        Ok(contents)
    }
}

/// Builds a zip archive with a single `repo-<commit>/` root directory.
pub fn build_archive(commit: CommitHash, date: SnippetDate) -> Result<Vec<u8>> {
    let modified = DateTime::from_date_and_time(
        date.year(),
        date.month(),
        date.day(),
        12,
        0,
        0,
    )
    .map_err(|e| anyhow::anyhow!("invalid zip timestamp: {e:?}"))?;
    let options = SimpleFileOptions::default().last_modified_time(modified);
    let root = format!("repo-{commit}/");

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.add_directory(root.as_str(), options)?;
    writer.start_file(format!("{root}README.md"), options)?;
    writer.write_all(b"# Example\n")?;
    Ok(writer.finish()?.into_inner())
}

/// A [`Fetcher`] that treats URLs as local paths.
pub struct LocalFetcher;

impl Fetcher for LocalFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        fs::read(url).map_err(|error| FetchError::Transport {
            url: url.to_owned(),
            source: Box::new(error),
        })
    }
}
