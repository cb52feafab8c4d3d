// Copyright 2026 Google LLC

use crate::helpers::{Fixture, LocalFetcher, git};
use anyhow::Result;
use camino_tempfile::Utf8TempDir;
use std::fs;
use workspace_snippets::{ArchiveChecksum, ArchiveIntegrity, SnippetDate};
use workspace_snippets_update::{
    GITHUB_URL_PREFIX, ResolveError, Resolver,
};

fn date() -> SnippetDate {
    SnippetDate::new(2021, 4, 24).unwrap()
}

#[test]
fn test_resolve() -> Result<()> {
    let (fixture, commit) = Fixture::with_commit()?;
    let archive = fixture.publish_archive(commit, date())?;

    let context = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher)?;

    assert_eq!(context.commit(), commit);
    assert_eq!(context.checksum(), ArchiveChecksum::of(&archive));
    assert_eq!(context.integrity(), Some(ArchiveIntegrity::of(&archive)));
    assert_eq!(context.date(), date());

    Ok(())
}

#[test]
fn test_resolve_from_subdirectory() -> Result<()> {
    let (fixture, commit) = Fixture::with_commit()?;
    fixture.publish_archive(commit, date())?;
    let subdir = fixture.worktree().join("docs");
    fs::create_dir_all(&subdir)?;

    let context = Resolver::new(subdir, fixture.root().as_str())?
        .resolve(&LocalFetcher)?;
    assert_eq!(context.commit(), commit);

    Ok(())
}

#[test]
fn test_resolve_uses_default_branch() -> Result<()> {
    let fixture = Fixture::new()?;
    let old = fixture.commit("README.md", "old\n")?;
    fixture.push(old, "master")?;
    let new = fixture.commit("README.md", "new\n")?;
    fixture.push(new, "main")?;
    fixture.publish_archive(new, date())?;

    let context = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher)?;
    assert_eq!(context.commit(), new, "remote HEAD points to main");

    Ok(())
}

#[test]
fn test_resolve_ignores_local_commits() -> Result<()> {
    let (fixture, pushed) = Fixture::with_commit()?;
    fixture.publish_archive(pushed, date())?;
    let local = fixture.commit("README.md", "not pushed\n")?;
    assert_ne!(local, pushed);

    let context = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher)?;
    assert_eq!(context.commit(), pushed);

    Ok(())
}

#[test]
fn test_resolve_no_matching_remote() -> Result<()> {
    let (fixture, _) = Fixture::with_commit()?;

    let result = Resolver::new(fixture.worktree(), GITHUB_URL_PREFIX)?
        .resolve(&LocalFetcher);
    assert!(
        matches!(result, Err(ResolveError::NoMatchingRemote { .. })),
        "should fail with NoMatchingRemote, got {result:?}"
    );

    Ok(())
}

#[test]
fn test_resolve_multiple_matching_remotes() -> Result<()> {
    let (fixture, _) = Fixture::with_commit()?;
    git(
        fixture.worktree(),
        &["remote", "add", "mirror", fixture.remote_url()],
    )?;

    let result = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher);
    match result {
        Err(ResolveError::MultipleMatchingRemotes { first, second, .. }) => {
            assert_eq!(first, "origin");
            assert_eq!(second, "mirror");
        }
        other => panic!("should fail with MultipleMatchingRemotes, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_resolve_no_default_branch() -> Result<()> {
    // Nothing has been pushed, so the remote HEAD is unborn.
    let fixture = Fixture::new()?;

    let result = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher);
    assert!(
        matches!(result, Err(ResolveError::NoDefaultBranch { .. })),
        "should fail with NoDefaultBranch, got {result:?}"
    );

    Ok(())
}

#[test]
fn test_resolve_missing_archive() -> Result<()> {
    let (fixture, _) = Fixture::with_commit()?;

    let result = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher);
    assert!(
        matches!(result, Err(ResolveError::Fetch { .. })),
        "should fail with Fetch, got {result:?}"
    );

    Ok(())
}

#[test]
fn test_resolve_not_a_repository() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("workspace-snippets-update-")?;

    let result =
        Resolver::new(temp.path(), GITHUB_URL_PREFIX)?.resolve(&LocalFetcher);
    assert!(
        matches!(result, Err(ResolveError::OpenRepository { .. })),
        "should fail with OpenRepository, got {result:?}"
    );

    Ok(())
}
