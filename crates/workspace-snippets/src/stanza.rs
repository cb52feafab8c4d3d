// Copyright 2026 Google LLC

//! Locating stanzas within arbitrary text.
//!
//! A stanza starts with a line consisting of an optional prefix followed by
//! `git_override(` or `http_archive(`, and ends with the next line consisting
//! of exactly the same prefix, optional blanks, and `)`. The prefix is any
//! leading whitespace plus an optional run of comment markers (`#`, `//`, ...)
//! plus more whitespace, which lets commented-out stanzas in documentation be
//! found and rewritten like live ones.

use crate::UnterminatedStanza;
use regex::Regex;
use std::{fmt, ops::Range, sync::LazyLock};

static BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*(?://+|#+)?[ \t]*)(git_override|http_archive)\($")
        .expect("stanza begin pattern is valid")
});

/// The kind of a stanza, named after the rule it invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StanzaKind {
    /// A `git_override(...)` stanza from a `MODULE.bazel` file.
    GitOverride,
    /// An `http_archive(...)` stanza from a `WORKSPACE` file.
    HttpArchive,
}

impl StanzaKind {
    /// Returns the rule name as it appears in the begin marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            StanzaKind::GitOverride => "git_override",
            StanzaKind::HttpArchive => "http_archive",
        }
    }
}

impl fmt::Display for StanzaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stanza found by [`StanzaLocator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stanza<'a> {
    kind: StanzaKind,
    prefix: &'a str,
    text: &'a str,
    span: Range<usize>,
    line: usize,
}

impl<'a> Stanza<'a> {
    /// Returns the kind of this stanza.
    pub fn kind(&self) -> StanzaKind {
        self.kind
    }

    /// Returns the literal prefix shared by every line of the stanza.
    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    /// Returns the stanza text, from the start of the begin marker line up to
    /// (but not including) the newline after the end marker.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the byte range of [`text`](Self::text) within the document.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the 1-based line number of the begin marker.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the stanza is commented out, i.e. its prefix contains comment
    /// markers.
    pub fn is_commented(&self) -> bool {
        self.prefix.contains(['#', '/'])
    }

    /// Returns the stanza text with the prefix removed from every line.
    pub fn strip_prefix(&self) -> String {
        self.text
            .split('\n')
            .map(|line| strip_line_prefix(line, self.prefix))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Removes `prefix` from `line`.
///
/// A line that consists of the prefix minus its trailing blanks (typically an
/// empty line in a commented-out stanza, like a lone `#`) becomes empty.
/// Other lines are returned as is.
pub(crate) fn strip_line_prefix<'l>(line: &'l str, prefix: &str) -> &'l str {
    if let Some(rest) = line.strip_prefix(prefix) {
        rest
    } else if line == prefix.trim_end() {
        ""
    } else {
        line
    }
}

/// Prepends `prefix` to every line of `text`. Empty lines get the prefix with
/// trailing blanks removed, so no trailing whitespace is introduced.
pub(crate) fn add_line_prefix(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.is_empty() {
            out.push_str(prefix.trim_end());
        } else {
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}

/// An iterator over the stanzas in a document, in order.
///
/// Yields an error (and then stops) if a begin marker has no matching end
/// marker.
///
/// ```
/// use workspace_snippets::{StanzaKind, StanzaLocator};
///
/// let doc = "Intro\n\n# git_override(\n#     commit = \"\",\n# )\n";
/// let stanzas: Vec<_> =
///     StanzaLocator::new(doc).collect::<Result<_, _>>().unwrap();
/// assert_eq!(stanzas.len(), 1);
/// assert_eq!(stanzas[0].kind(), StanzaKind::GitOverride);
/// assert_eq!(stanzas[0].prefix(), "# ");
/// ```
#[derive(Clone, Debug)]
pub struct StanzaLocator<'a> {
    contents: &'a str,
    pos: usize,
    line: usize,
    done: bool,
}

impl<'a> StanzaLocator<'a> {
    /// Creates a locator over the given document.
    pub fn new(contents: &'a str) -> Self {
        StanzaLocator { contents, pos: 0, line: 1, done: false }
    }

    /// Advances the line counter to byte offset `to`.
    fn advance(&mut self, to: usize) {
        self.line += self.contents[self.pos..to].matches('\n').count();
        self.pos = to;
    }
}

impl<'a> Iterator for StanzaLocator<'a> {
    type Item = Result<Stanza<'a>, UnterminatedStanza>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(captures) = BEGIN.captures_at(self.contents, self.pos) else {
            self.done = true;
            return None;
        };
        let begin = captures.get_match();
        let prefix = captures.get(1).map_or("", |m| m.as_str());
        let kind = match captures.get(2).map(|m| m.as_str()) {
            Some("git_override") => StanzaKind::GitOverride,
            _ => StanzaKind::HttpArchive,
        };
        self.advance(begin.start());
        let line = self.line;

        // Scan the lines after the begin marker for `<prefix><blanks>)`.
        let mut line_start = begin.end() + 1;
        while line_start <= self.contents.len() {
            let rest = &self.contents[line_start..];
            let line_end =
                rest.find('\n').map_or(self.contents.len(), |i| line_start + i);
            let candidate = &self.contents[line_start..line_end];
            let closes = candidate
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.trim_start_matches([' ', '\t']) == ")");
            if closes {
                let span = begin.start()..line_end;
                let stanza = Stanza {
                    kind,
                    prefix,
                    text: &self.contents[span.clone()],
                    span,
                    line,
                };
                self.advance(line_end);
                return Some(Ok(stanza));
            }
            line_start = line_end + 1;
        }

        self.done = true;
        Some(Err(UnterminatedStanza { kind, line, prefix: prefix.to_owned() }))
    }
}
