// Copyright 2026 Google LLC

//! Rewriting stanzas and documents.

use crate::{
    RewriteError, Stanza, StanzaLocator, UpdateContext,
    stanza::add_line_prefix,
    syntax::{self, Argument, Comment, Element, Entry, Expr, Sequence},
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date pattern is valid")
});
static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:xdigit:]]*$").expect("hex pattern is valid")
});
static ARCHIVE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+/)[[:xdigit:]]*(\.zip)$")
        .expect("archive URL pattern is valid")
});
static HEX_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)[[:xdigit:]]*$").expect("hex suffix pattern is valid")
});

/// The result of [`rewrite_document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewritten {
    contents: String,
    stanzas: usize,
    unparsed: usize,
}

impl Rewritten {
    /// Returns the rewritten document.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Consumes `self`, returning the rewritten document.
    pub fn into_contents(self) -> String {
        self.contents
    }

    /// Returns the number of stanzas found.
    pub fn stanzas(&self) -> usize {
        self.stanzas
    }

    /// Returns the number of stanzas whose body couldn't be parsed and was
    /// left unchanged.
    pub fn unparsed(&self) -> usize {
        self.unparsed
    }
}

/// Rewrites every stanza in `contents`.
///
/// Text outside stanzas is copied unchanged. Fails if there is no stanza at
/// all, or if a stanza is missing its end marker.
///
/// ```
/// use workspace_snippets::{
///     ArchiveChecksum, UpdateContext, rewrite_document,
/// };
///
/// let context = UpdateContext::new(
///     "0123456789abcdef0123456789abcdef01234567".parse().unwrap(),
///     ArchiveChecksum::of(b"archive"),
///     "2021-04-24".parse().unwrap(),
/// );
/// let doc = "git_override(\n    commit = \"\",  # 2020-01-01\n)\n";
/// let rewritten = rewrite_document(doc, &context).unwrap();
/// assert_eq!(
///     rewritten.contents(),
///     "git_override(\n    commit = \
///      \"0123456789abcdef0123456789abcdef01234567\",  # 2021-04-24\n)\n",
/// );
/// ```
pub fn rewrite_document(
    contents: &str,
    context: &UpdateContext,
) -> Result<Rewritten, RewriteError> {
    let mut out = String::with_capacity(contents.len());
    let mut pos = 0;
    let mut stanzas = 0;
    let mut unparsed = 0;
    for stanza in StanzaLocator::new(contents) {
        let stanza = stanza?;
        let span = stanza.span();
        out.push_str(&contents[pos..span.start]);
        match rewrite_stanza(&stanza, context) {
            Some(text) => out.push_str(&text),
            None => {
                out.push_str(stanza.text());
                unparsed += 1;
            }
        }
        pos = span.end;
        stanzas += 1;
    }
    if stanzas == 0 {
        return Err(RewriteError::NoStanza);
    }
    out.push_str(&contents[pos..]);
    Ok(Rewritten { contents: out, stanzas, unparsed })
}

/// Rewrites a single stanza, returning the new stanza text.
///
/// The prefix is stripped from every line, the body is parsed, rewritten with
/// [`rewrite_expr`] and printed canonically, and the prefix is put back.
/// Returns `None` if the body can't be parsed; the stanza should then be left
/// as it is.
pub fn rewrite_stanza(
    stanza: &Stanza<'_>,
    context: &UpdateContext,
) -> Option<String> {
    let body = stanza.strip_prefix();
    let expr = match syntax::parse(&body) {
        Ok(expr) => expr,
        Err(error) => {
            warn!(
                kind = %stanza.kind(),
                line = stanza.line(),
                %error,
                "stanza body could not be parsed, leaving it unchanged",
            );
            return None;
        }
    };
    debug!(
        kind = %stanza.kind(),
        line = stanza.line(),
        commented = stanza.is_commented(),
        "rewriting stanza",
    );
    let printed = syntax::print(&rewrite_expr(&expr, context));
    let printed = printed.strip_suffix('\n').unwrap_or(&printed);
    Some(add_line_prefix(printed, stanza.prefix()))
}

/// Returns a copy of `expr` with hash-bearing fields and date comments
/// updated from `context`.
///
/// Every keyword argument anywhere in the tree is considered:
///
/// | field          | rewritten if the value is     | to                          |
/// |----------------|-------------------------------|-----------------------------|
/// | `commit`       | hex digits (possibly none)    | the commit hash             |
/// | `urls`         | `.../<hex digits>.zip`        | the same URL with the hash  |
/// | `sha256`       | hex digits (possibly none)    | the archive checksum        |
/// | `integrity`    | anything                      | the archive integrity       |
/// | `strip_prefix` | anything ending in hex digits | the prefix plus the hash    |
///
/// A value may be a string or a list of exactly one string. Values in any
/// other shape, or not matching the pattern, are left alone. Every date
/// (`YYYY-MM-DD`) in every comment is replaced by the context date.
pub fn rewrite_expr(expr: &Expr, context: &UpdateContext) -> Expr {
    let boxed = |e: &Expr| Box::new(rewrite_expr(e, context));
    match expr {
        Expr::Ident(_) | Expr::Int(_) | Expr::Str(_) => expr.clone(),
        Expr::List(seq) => Expr::List(rewrite_sequence(seq, context, |e| {
            rewrite_expr(e, context)
        })),
        Expr::Tuple(seq) => Expr::Tuple(rewrite_sequence(seq, context, |e| {
            rewrite_expr(e, context)
        })),
        Expr::Paren(inner) => Expr::Paren(boxed(inner)),
        Expr::Dict(seq) => Expr::Dict(rewrite_sequence(seq, context, |entry| {
            Entry {
                key: rewrite_expr(&entry.key, context),
                value: rewrite_expr(&entry.value, context),
            }
        })),
        Expr::Call { callee, args } => Expr::Call {
            callee: boxed(callee),
            args: rewrite_sequence(args, context, |arg| match arg {
                Argument::Positional(value) => {
                    Argument::Positional(rewrite_expr(value, context))
                }
                Argument::Keyword { name, value } => Argument::Keyword {
                    name: name.clone(),
                    value: rewrite_field(
                        name,
                        &rewrite_expr(value, context),
                        context,
                    ),
                },
            }),
        },
        Expr::Dot { object, name } => {
            Expr::Dot { object: boxed(object), name: name.clone() }
        }
        Expr::Index { object, index } => {
            Expr::Index { object: boxed(object), index: boxed(index) }
        }
        Expr::Neg(operand) => Expr::Neg(boxed(operand)),
        Expr::Binary { left, op, right } => {
            Expr::Binary { left: boxed(left), op: *op, right: boxed(right) }
        }
    }
}

fn rewrite_sequence<T>(
    seq: &Sequence<T>,
    context: &UpdateContext,
    mut item: impl FnMut(&T) -> T,
) -> Sequence<T> {
    Sequence {
        elements: seq
            .elements
            .iter()
            .map(|element| Element {
                before: rewrite_comments(&element.before, context),
                item: item(&element.item),
                suffix: element
                    .suffix
                    .as_ref()
                    .map(|comment| rewrite_comment(comment, context)),
            })
            .collect(),
        after: rewrite_comments(&seq.after, context),
        multiline: seq.multiline,
    }
}

fn rewrite_comments(
    comments: &[Comment],
    context: &UpdateContext,
) -> Vec<Comment> {
    comments.iter().map(|c| rewrite_comment(c, context)).collect()
}

fn rewrite_comment(comment: &Comment, context: &UpdateContext) -> Comment {
    let date = context.date().to_string();
    Comment::new(DATE.replace_all(comment.text(), date.as_str()))
}

/// Substitutes the value of the keyword argument `name`.
fn rewrite_field(name: &str, value: &Expr, context: &UpdateContext) -> Expr {
    let commit = context.commit().to_string();
    match name {
        "commit" => substitute(value, |s| HEX.is_match(s).then(|| commit.clone())),
        "urls" => substitute(value, |s| {
            let captures = ARCHIVE_URL.captures(s)?;
            Some(format!("{}{}{}", &captures[1], commit, &captures[2]))
        }),
        "sha256" => substitute(value, |s| {
            HEX.is_match(s).then(|| context.checksum().to_string())
        }),
        "integrity" => match context.integrity() {
            Some(integrity) => substitute(value, |_| Some(integrity.to_string())),
            None => value.clone(),
        },
        "strip_prefix" => substitute(value, |s| {
            let captures = HEX_SUFFIX.captures(s)?;
            Some(format!("{}{}", &captures[1], commit))
        }),
        _ => value.clone(),
    }
}

/// Applies `f` to a string value, or to the only string in a one-element
/// list. `f` returns `None` to leave the value alone.
fn substitute(value: &Expr, f: impl Fn(&str) -> Option<String>) -> Expr {
    match value {
        Expr::Str(s) => match f(s.value()) {
            Some(new) => Expr::Str(s.with_value(new)),
            None => value.clone(),
        },
        Expr::List(seq) => match seq.elements.as_slice() {
            [Element { item: Expr::Str(s), .. }] => match f(s.value()) {
                Some(new) => {
                    let mut seq = seq.clone();
                    seq.elements[0].item = Expr::Str(s.with_value(new));
                    Expr::List(seq)
                }
                None => value.clone(),
            },
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ArchiveChecksum, ArchiveIntegrity, CommitHash, SnippetDate,
    };

    const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";
    const OLD_COMMIT: &str = "89abcdef0123456789abcdef0123456789abcdef";

    fn context() -> UpdateContext {
        let commit: CommitHash = COMMIT.parse().unwrap();
        UpdateContext::new(
            commit,
            ArchiveChecksum::of(b"archive contents\n"),
            SnippetDate::new(2021, 4, 24).unwrap(),
        )
    }

    fn checksum() -> String {
        ArchiveChecksum::of(b"archive contents\n").to_string()
    }

    fn rewrite(doc: &str) -> String {
        rewrite_document(doc, &context()).unwrap().into_contents()
    }

    #[test]
    fn test_rewrite_http_archive() {
        let before = "\
To use this repository, add the following to your WORKSPACE file:

http_archive(
    name = \"foo\",
    urls = [\"http://archive/.zip\"],
    sha256 = \"\",
    strip_prefix = \"repo-\",
)

Have a nice day!";
        let after = format!(
            "\
To use this repository, add the following to your WORKSPACE file:

http_archive(
    name = \"foo\",
    urls = [\"http://archive/{COMMIT}.zip\"],
    sha256 = \"{}\",
    strip_prefix = \"repo-{COMMIT}\",
)

Have a nice day!",
            checksum()
        );
        assert_eq!(rewrite(before), after);
        assert_eq!(rewrite(&after), after, "rewriting is idempotent");
    }

    #[test]
    fn test_rewrite_replaces_old_hashes() {
        let before = format!(
            "  http_archive(\n      name = \"foo\",\n      \
             urls = [\"https://github.com/o/r/archive/{OLD_COMMIT}.zip\"],\n      \
             sha256 = \"00ff\",\n      strip_prefix = \"r-{OLD_COMMIT}\",\n  )\n"
        );
        let after = format!(
            "  http_archive(\n      name = \"foo\",\n      \
             urls = [\"https://github.com/o/r/archive/{COMMIT}.zip\"],\n      \
             sha256 = \"{}\",\n      strip_prefix = \"r-{COMMIT}\",\n  )\n",
            checksum()
        );
        assert_eq!(rewrite(&before), after);
    }

    #[test]
    fn test_rewrite_git_override_commented() {
        let before = "\
Add this to MODULE.bazel:

# bazel_dep(name = \"foo\")
# git_override(
#     module_name = \"foo\",
#     remote = \"https://github.com/o/foo.git\",
#     commit = \"\",  # 2020-01-01
#
#     # Updated 1999-12-31.
# )
";
        let after = format!(
            "\
Add this to MODULE.bazel:

# bazel_dep(name = \"foo\")
# git_override(
#     module_name = \"foo\",
#     remote = \"https://github.com/o/foo.git\",
#     commit = \"{COMMIT}\",  # 2021-04-24
#     # Updated 2021-04-24.
# )
"
        );
        assert_eq!(rewrite(before), after);
        assert_eq!(rewrite(&after), after);
    }

    #[test]
    fn test_rewrite_mixed_markers_are_not_a_prefix() {
        // `//!` isn't a run of a single comment marker, so no stanza is
        // found.
        let doc = "//! http_archive(\n//!     sha256 = \"\",\n//! )\n";
        assert_eq!(
            rewrite_document(doc, &context()),
            Err(RewriteError::NoStanza)
        );
    }

    #[test]
    fn test_rewrite_doc_comment_prefix() {
        let before = "/// Example:\n///\n/// http_archive(\n///     sha256 = \"\",\n/// )\nfn f() {}\n";
        let after = format!(
            "/// Example:\n///\n/// http_archive(\n///     sha256 = \"{}\",\n/// )\nfn f() {{}}\n",
            checksum()
        );
        assert_eq!(rewrite(before), after);
    }

    #[test]
    fn test_rewrite_leaves_mismatched_values() {
        let before = "\
git_override(
    commit = \"not-a-hash\",
    sha256 = \"xyz\",
    urls = [\"https://example.com/v1.zip\"],
)";
        assert_eq!(rewrite(before), before);
    }

    #[test]
    fn test_rewrite_value_shapes() {
        let before = "\
http_archive(
    urls = [\"https://a/.zip\", \"https://b/.zip\"],
    commit = [\"\"],
    sha256 = 42,
    strip_prefix = \"\",
)";
        let after = format!(
            "\
http_archive(
    urls = [\"https://a/.zip\", \"https://b/.zip\"],
    commit = [\"{COMMIT}\"],
    sha256 = 42,
    strip_prefix = \"{COMMIT}\",
)"
        );
        assert_eq!(rewrite(before), after);
    }

    #[test]
    fn test_rewrite_empty_stanza_stays_a_stanza() {
        let before = "# git_override(\n# )\n";
        let first = rewrite_document(before, &context()).unwrap();
        assert_eq!(first.contents(), before);
        let second = rewrite_document(first.contents(), &context()).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_rewrite_url_needs_path_before_hash() {
        let before = "http_archive(\n    urls = [\"/.zip\"],\n)";
        assert_eq!(rewrite(before), before);
    }

    #[test]
    fn test_rewrite_integrity() {
        let before = "http_archive(\n    integrity = \"sha256-old\",\n)";
        assert_eq!(rewrite(before), before, "no integrity in the context");

        let integrity = ArchiveIntegrity::of(b"archive contents\n");
        let context = context().with_integrity(integrity);
        let rewritten = rewrite_document(before, &context).unwrap();
        assert_eq!(
            rewritten.contents(),
            format!("http_archive(\n    integrity = \"{integrity}\",\n)")
        );
    }

    #[test]
    fn test_rewrite_unparsable_body_is_kept() {
        let before = "\
http_archive(
    name = \"foo\"
    sha256 = \"\",
)
git_override(
    commit = \"\",
)
";
        let rewritten = rewrite_document(before, &context()).unwrap();
        assert_eq!(rewritten.stanzas(), 2);
        assert_eq!(rewritten.unparsed(), 1);
        assert_eq!(
            rewritten.contents(),
            format!(
                "\
http_archive(
    name = \"foo\"
    sha256 = \"\",
)
git_override(
    commit = \"{COMMIT}\",
)
"
            )
        );
    }

    #[test]
    fn test_rewrite_errors() {
        assert_eq!(
            rewrite_document("nothing to see\n", &context()),
            Err(RewriteError::NoStanza)
        );
        assert!(matches!(
            rewrite_document("git_override(\n    commit = \"\",\n", &context()),
            Err(RewriteError::Unterminated(_))
        ));
        // A good stanza followed by an unterminated one still fails.
        assert!(matches!(
            rewrite_document(
                "git_override(\n)\n# http_archive(\n)\n",
                &context()
            ),
            Err(RewriteError::Unterminated(_))
        ));
    }

    #[test]
    fn test_rewrite_preserves_surrounding_text() {
        let prefix = "  leading  \n\n\twith tabs\t\n";
        let suffix = "\ntrailing without newline";
        let doc = format!("{prefix}git_override(\n    commit = \"\",\n){suffix}");
        let rewritten = rewrite(&doc);
        assert!(rewritten.starts_with(prefix));
        assert!(rewritten.ends_with(suffix));
    }

    #[test]
    fn test_rewrite_expr_dates_everywhere() {
        let expr = syntax::parse(
            "f(\n    # 2000-01-01 and 2000-02-02\n    x = [\n        1,  # 2000-03-03\n        # 2000-04-04\n    ],\n)",
        )
        .unwrap();
        let printed = syntax::print(&rewrite_expr(&expr, &context()));
        assert_eq!(
            printed,
            "f(\n    # 2021-04-24 and 2021-04-24\n    x = [\n        1,  # 2021-04-24\n        # 2021-04-24\n    ],\n)\n"
        );
    }

    #[test]
    fn test_rewrite_expr_nested_calls() {
        let expr = syntax::parse("outer(inner(commit = \"\"))").unwrap();
        let printed = syntax::print(&rewrite_expr(&expr, &context()));
        assert_eq!(printed, format!("outer(inner(commit = \"{COMMIT}\"))\n"));
    }
}
