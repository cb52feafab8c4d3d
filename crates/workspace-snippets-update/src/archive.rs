// Copyright 2026 Google LLC

//! Downloading source archives and computing their metadata.

use crate::{ArchiveError, FetchError};
use regex::Regex;
use reqwest::{StatusCode, blocking::Client};
use std::{io::Cursor, sync::LazyLock};
use tracing::debug;
use workspace_snippets::{
    ArchiveChecksum, ArchiveIntegrity, CommitHash, SnippetDate, UpdateContext,
};
use zip::ZipArchive;

static ROOT_DIRECTORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^/]+/$").expect("root directory pattern is valid")
});

/// Returns the URL of the zip archive of `commit`, GitHub style.
///
/// A trailing `.git` is removed from `remote_url` first; archive URLs don't
/// work with it.
///
/// ```
/// use workspace_snippets_update::archive_url;
///
/// let commit = "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
/// assert_eq!(
///     archive_url("https://github.com/owner/repo.git", commit),
///     "https://github.com/owner/repo/archive/\
///      0123456789abcdef0123456789abcdef01234567.zip",
/// );
/// ```
pub fn archive_url(remote_url: &str, commit: CommitHash) -> String {
    let base = remote_url.strip_suffix(".git").unwrap_or(remote_url);
    format!("{base}/archive/{commit}.zip")
}

/// Downloads archives.
pub trait Fetcher {
    /// Returns the full contents at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// A [`Fetcher`] that downloads over HTTP(S).
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default blocking client.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpFetcher { client })
    }

    /// Creates a fetcher using the given client.
    pub fn with_client(client: Client) -> Self {
        HttpFetcher { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(url, "downloading archive");
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_owned(),
            source: Box::new(source),
        };
        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.to_string(),
            });
        }
        let body = response.bytes().map_err(transport)?;
        debug!(url, bytes = body.len(), "downloaded archive");
        Ok(body.to_vec())
    }
}

/// The checksums and date of a source archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveMetadata {
    checksum: ArchiveChecksum,
    integrity: ArchiveIntegrity,
    date: SnippetDate,
}

impl ArchiveMetadata {
    /// Computes the metadata of a zip archive.
    ///
    /// The date is the modification date of the single top-level directory
    /// entry (e.g. `repo-〈hash〉/`), which GitHub sets to the commit date.
    pub fn from_bytes(contents: &[u8]) -> Result<Self, ArchiveError> {
        let checksum = ArchiveChecksum::of(contents);
        let integrity = ArchiveIntegrity::of(contents);

        let mut archive = ZipArchive::new(Cursor::new(contents))?;
        let mut roots = Vec::new();
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            if ROOT_DIRECTORY.is_match(entry.name()) {
                roots.push((entry.name().to_owned(), entry.last_modified()));
            }
        }

        let (name, modified) = match roots.len() {
            0 => return Err(ArchiveError::NoRootDirectory),
            1 => roots.remove(0),
            _ => {
                return Err(ArchiveError::MultipleRootDirectories(
                    roots.into_iter().map(|(name, _)| name).collect(),
                ));
            }
        };
        let Some(modified) = modified else {
            return Err(ArchiveError::NoTimestamp { name });
        };
        let date =
            SnippetDate::new(modified.year(), modified.month(), modified.day())
                .map_err(|error| ArchiveError::InvalidTimestamp {
                    name: name.clone(),
                    error,
                })?;

        Ok(ArchiveMetadata { checksum, integrity, date })
    }

    /// Returns the SHA-256 checksum of the archive.
    pub fn checksum(&self) -> ArchiveChecksum {
        self.checksum
    }

    /// Returns the SHA-384 integrity digest of the archive.
    pub fn integrity(&self) -> ArchiveIntegrity {
        self.integrity
    }

    /// Returns the modification date of the archive's top-level directory.
    pub fn date(&self) -> SnippetDate {
        self.date
    }

    /// Combines the metadata with the commit it was downloaded for.
    pub fn into_context(self, commit: CommitHash) -> UpdateContext {
        UpdateContext::new(commit, self.checksum, self.date)
            .with_integrity(self.integrity)
    }
}
