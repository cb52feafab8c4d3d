// Copyright 2026 Google LLC

//! Error types for workspace snippet operations.

use crate::StanzaKind;
use thiserror::Error;

/// An error that occurs while parsing a
/// [`CommitHash`](crate::CommitHash).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CommitHashParseError {
    /// The commit hash has an invalid length.
    #[error(
        "invalid length: expected 40 (SHA-1) or 64 (SHA-256) hex characters, \
         got {0}"
    )]
    InvalidLength(usize),

    /// The commit hash is not valid hexadecimal.
    #[error("invalid hexadecimal")]
    InvalidHex(#[source] hex::FromHexError),
}

/// An error that occurs while parsing a [`SnippetDate`](crate::SnippetDate).
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DateParseError {
    /// The input was not in `YYYY-MM-DD` form.
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidFormat(String),

    /// The input is in `YYYY-MM-DD` form but names no calendar day.
    #[error("invalid date {input:?}")]
    InvalidDate {
        /// The input.
        input: String,
        /// The underlying error.
        #[source]
        error: chrono::ParseError,
    },

    /// The year, month and day do not form a calendar day.
    #[error("date {year:04}-{month:02}-{day:02} does not exist")]
    OutOfRange {
        /// The year (at most 9999).
        year: u16,
        /// The month.
        month: u8,
        /// The day.
        day: u8,
    },
}

/// A stanza begin marker without a matching end marker.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "{kind} stanza starting on line {line} is not properly terminated \
     (expected a line {prefix:?} followed by `)`)"
)]
pub struct UnterminatedStanza {
    /// The kind of the unterminated stanza.
    pub kind: StanzaKind,
    /// The 1-based line number of the begin marker.
    pub line: usize,
    /// The prefix captured at the begin marker.
    pub prefix: String,
}

/// An error that occurs while rewriting a whole document.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RewriteError {
    /// The document contains no `git_override` or `http_archive` stanza.
    #[error("no git_override or http_archive stanza found")]
    NoStanza,

    /// A stanza has a begin marker but no end marker.
    #[error(transparent)]
    Unterminated(#[from] UnterminatedStanza),
}

/// An error that occurs while parsing a stanza body.
///
/// These errors never escape a rewrite: a body that fails to parse is passed
/// through unchanged.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// The lexer found a character it doesn't understand.
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedChar {
        /// The 1-based line number.
        line: usize,
        /// The offending character.
        ch: char,
    },

    /// A string literal is missing its closing quote.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString {
        /// The 1-based line number where the string starts.
        line: usize,
    },

    /// The parser found a token it doesn't expect at this point.
    #[error("line {line}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        /// The 1-based line number.
        line: usize,
        /// A description of the token found.
        found: String,
        /// A description of what was expected.
        expected: &'static str,
    },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// A description of what was expected.
        expected: &'static str,
    },
}
