// Copyright 2026 Google LLC

use crate::helpers::{Fixture, LocalFetcher, write_file};
use anyhow::Result;
use camino::Utf8PathBuf;
use camino_tempfile::Utf8TempDir;
use std::fs;
use workspace_snippets::{
    ArchiveChecksum, CommitHash, RewriteError, SnippetDate, UpdateContext,
};
use workspace_snippets_update::{Resolver, UpdateFileError, update_file};

const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

const README: &str = "\
# Example

Add this to your WORKSPACE file:

```starlark
http_archive(
    name = \"example\",
    urls = [\"https://github.com/owner/example/archive/.zip\"],
    sha256 = \"\",
    strip_prefix = \"example-\",
)
```
";

fn context() -> UpdateContext {
    let commit: CommitHash = COMMIT.parse().unwrap();
    UpdateContext::new(
        commit,
        ArchiveChecksum::of(b"archive contents\n"),
        SnippetDate::new(2021, 4, 24).unwrap(),
    )
}

fn expected_readme() -> String {
    format!(
        "\
# Example

Add this to your WORKSPACE file:

```starlark
http_archive(
    name = \"example\",
    urls = [\"https://github.com/owner/example/archive/{COMMIT}.zip\"],
    sha256 = \"{}\",
    strip_prefix = \"example-{COMMIT}\",
)
```
",
        ArchiveChecksum::of(b"archive contents\n")
    )
}

fn setup(contents: &str) -> Result<(Utf8TempDir, Utf8PathBuf)> {
    let temp = Utf8TempDir::with_prefix("workspace-snippets-update-")?;
    let path = temp.path().join("README.md");
    write_file(&path, contents)?;
    Ok((temp, path))
}

#[test]
fn test_update_file() -> Result<()> {
    let (_temp, path) = setup(README)?;

    let rewritten = update_file(&path, &context())?;

    assert_eq!(rewritten.stanzas(), 1);
    assert_eq!(rewritten.unparsed(), 0);
    assert_eq!(fs::read_to_string(&path)?, expected_readme());

    Ok(())
}

#[test]
fn test_update_file_is_idempotent() -> Result<()> {
    let (_temp, path) = setup(README)?;

    update_file(&path, &context())?;
    update_file(&path, &context())?;
    assert_eq!(fs::read_to_string(&path)?, expected_readme());

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_update_file_up_to_date_is_not_written() -> Result<()> {
    use std::os::unix::fs::MetadataExt;

    let (_temp, path) = setup(&expected_readme())?;
    let before = fs::metadata(&path)?.ino();

    let rewritten = update_file(&path, &context())?;

    assert_eq!(rewritten.contents(), expected_readme());
    // An atomic write would have replaced the file with a new inode.
    assert_eq!(fs::metadata(&path)?.ino(), before);

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_update_file_preserves_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup(README)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640))?;

    update_file(&path, &context())?;

    assert_eq!(fs::read_to_string(&path)?, expected_readme());
    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o640);

    Ok(())
}

#[test]
fn test_update_file_without_stanza() -> Result<()> {
    let contents = "# Example\n\nNothing to see here.\n";
    let (_temp, path) = setup(contents)?;

    let result = update_file(&path, &context());

    assert!(
        matches!(
            result,
            Err(UpdateFileError::Rewrite { error: RewriteError::NoStanza, .. })
        ),
        "should fail with NoStanza, got {result:?}"
    );
    assert_eq!(fs::read_to_string(&path)?, contents, "file is untouched");

    Ok(())
}

#[test]
fn test_update_file_unterminated_stanza() -> Result<()> {
    let contents = "\
http_archive(
    name = \"ok\",
    sha256 = \"\",
)

http_archive(
    name = \"broken\",
    sha256 = \"\",
";
    let (_temp, path) = setup(contents)?;

    let result = update_file(&path, &context());

    assert!(
        matches!(
            result,
            Err(UpdateFileError::Rewrite {
                error: RewriteError::Unterminated(_),
                ..
            })
        ),
        "should fail with Unterminated, got {result:?}"
    );
    assert_eq!(
        fs::read_to_string(&path)?,
        contents,
        "earlier stanzas aren't written either"
    );

    Ok(())
}

#[test]
fn test_update_file_missing() -> Result<()> {
    let temp = Utf8TempDir::with_prefix("workspace-snippets-update-")?;

    let result = update_file(&temp.path().join("missing.md"), &context());

    assert!(
        matches!(result, Err(UpdateFileError::Read { .. })),
        "should fail with Read, got {result:?}"
    );

    Ok(())
}

#[test]
fn test_resolve_and_update() -> Result<()> {
    let (fixture, commit) = Fixture::with_commit()?;
    let archive = fixture
        .publish_archive(commit, SnippetDate::new(2023, 11, 5).unwrap())?;
    let path = fixture.worktree().join("MODULE.bazel");
    write_file(
        &path,
        "\
# git_override(
#     module_name = \"example\",
#     commit = \"\",  # 2020-01-01
# )
",
    )?;

    let context = Resolver::new(fixture.worktree(), fixture.root().as_str())?
        .resolve(&LocalFetcher)?;
    update_file(&path, &context)?;

    assert_eq!(
        fs::read_to_string(&path)?,
        format!(
            "\
# git_override(
#     module_name = \"example\",
#     commit = \"{commit}\",  # 2023-11-05
# )
"
        )
    );
    assert_eq!(context.checksum(), ArchiveChecksum::of(&archive));

    Ok(())
}
