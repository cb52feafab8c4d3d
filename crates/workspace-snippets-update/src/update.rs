// Copyright 2026 Google LLC

//! Updating files in place.

use crate::{AtomicWriteError, UpdateFileError};
use atomicwrites::AtomicFile;
use camino::Utf8Path;
use fs_err as fs;
use std::io::Write;
use tracing::{debug, info};
use workspace_snippets::{Rewritten, UpdateContext, rewrite_document};

/// Rewrites all stanzas in the file at `path` using `context`.
///
/// The file is replaced atomically and keeps its permissions. If nothing
/// changed, the file isn't written at all. If the file has no stanza or an
/// unterminated one, it's left untouched and an error is returned.
pub fn update_file(
    path: &Utf8Path,
    context: &UpdateContext,
) -> Result<Rewritten, UpdateFileError> {
    let contents = fs::read_to_string(path).map_err(|error| {
        UpdateFileError::Read { path: path.to_owned(), error }
    })?;
    let rewritten = rewrite_document(&contents, context).map_err(|error| {
        UpdateFileError::Rewrite { path: path.to_owned(), error }
    })?;

    if rewritten.contents() == contents {
        debug!(%path, stanzas = rewritten.stanzas(), "file is up to date");
        return Ok(rewritten);
    }

    let permissions = fs::metadata(path)
        .map_err(|error| UpdateFileError::Read { path: path.to_owned(), error })?
        .permissions();
    AtomicFile::new(path, atomicwrites::OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.set_permissions(permissions)?;
            f.write_all(rewritten.contents().as_bytes())
        })
        .map_err(|error| {
            let error = match error {
                atomicwrites::Error::Internal(e) => AtomicWriteError::Rename(e),
                atomicwrites::Error::User(e) => AtomicWriteError::Write(e),
            };
            UpdateFileError::Write { path: path.to_owned(), error }
        })?;
    info!(%path, stanzas = rewritten.stanzas(), "updated file");

    Ok(rewritten)
}

// Tests are in tests/integration/update.rs.
