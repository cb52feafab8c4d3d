// Copyright 2026 Google LLC

//! Resolving the [`UpdateContext`] for a repository.

use crate::{
    ArchiveMetadata, Fetcher, Git, Remote, ResolveError, archive_url,
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};
use workspace_snippets::UpdateContext;

/// The URL prefix of GitHub remotes.
pub const GITHUB_URL_PREFIX: &str = "https://github.com/";

/// Resolves the latest commit of a repository's GitHub remote and the
/// metadata of its source archive.
///
/// # Examples
///
/// ```no_run
/// use workspace_snippets_update::{
///     GITHUB_URL_PREFIX, HttpFetcher, Resolver,
/// };
///
/// let resolver = Resolver::new(".", GITHUB_URL_PREFIX)?;
/// let context = resolver.resolve(&HttpFetcher::new()?)?;
/// println!("latest commit: {}", context.commit());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Resolver {
    dir: Utf8PathBuf,
    url_prefix: String,
    git: Git,
}

impl Resolver {
    /// Creates a resolver for the repository containing `dir`.
    ///
    /// The repository must have exactly one remote with a URL starting with
    /// `url_prefix`, normally [`GITHUB_URL_PREFIX`]. Git is run using the
    /// `$GIT` environment variable or `"git"`.
    pub fn new(
        dir: impl Into<Utf8PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let dir = dir.into();
        let url_prefix = url_prefix.into();
        if url_prefix.is_empty() {
            return Err(ResolveError::EmptyUrlPrefix);
        }
        if dir.as_str().is_empty() {
            return Err(ResolveError::EmptyDirectory);
        }
        Ok(Resolver { dir, url_prefix, git: Git::from_env()? })
    }

    /// Overrides the git binary.
    pub fn with_git(mut self, git: Git) -> Self {
        self.git = git;
        self
    }

    /// Returns the directory the repository is searched from.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the URL prefix remotes must match.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Resolves the update context.
    ///
    /// This asks the remote for its default branch, downloads the archive
    /// for the commit it points to with `fetcher`, and computes the archive
    /// metadata. Any failure aborts resolution.
    pub fn resolve(
        &self,
        fetcher: &dyn Fetcher,
    ) -> Result<UpdateContext, ResolveError> {
        let repo_root = self.git.repo_root(&self.dir).map_err(|error| {
            ResolveError::OpenRepository { dir: self.dir.clone(), error }
        })?;
        debug!(%repo_root, "found Git repository");

        let remotes = self.git.remotes(&repo_root).map_err(|error| {
            ResolveError::ListRemotes { repo_root: repo_root.clone(), error }
        })?;
        let (remote, url) =
            find_remote(&remotes, &self.url_prefix, &repo_root)?;
        debug!(remote = remote.name(), url, "found matching remote");

        let commit = self
            .git
            .default_branch_head(&repo_root, url)
            .map_err(|error| ResolveError::ListReferences {
                url: url.to_owned(),
                error,
            })?
            .ok_or_else(|| ResolveError::NoDefaultBranch {
                url: url.to_owned(),
            })?;
        info!(remote = remote.name(), %commit, "resolved default branch");

        let archive_url = archive_url(url, commit);
        let contents = fetcher.fetch(&archive_url).map_err(|error| {
            ResolveError::Fetch { repo_root: repo_root.clone(), error }
        })?;
        let metadata = ArchiveMetadata::from_bytes(&contents).map_err(
            |error| ResolveError::Archive { url: archive_url.clone(), error },
        )?;
        info!(
            url = %archive_url,
            checksum = %metadata.checksum(),
            date = %metadata.date(),
            "inspected archive",
        );

        Ok(metadata.into_context(commit))
    }
}

/// Finds the only remote with a URL starting with `url_prefix`.
fn find_remote<'a>(
    remotes: &'a [Remote],
    url_prefix: &str,
    repo_root: &Utf8Path,
) -> Result<(&'a Remote, &'a str), ResolveError> {
    let mut found: Option<(&Remote, &str)> = None;
    for remote in remotes {
        let Some(url) = remote.matching_url(url_prefix) else {
            continue;
        };
        if let Some((first, _)) = found {
            return Err(ResolveError::MultipleMatchingRemotes {
                repo_root: repo_root.to_owned(),
                url_prefix: url_prefix.to_owned(),
                first: first.name().to_owned(),
                second: remote.name().to_owned(),
            });
        }
        found = Some((remote, url));
    }
    found.ok_or_else(|| ResolveError::NoMatchingRemote {
        repo_root: repo_root.to_owned(),
        url_prefix: url_prefix.to_owned(),
    })
}
