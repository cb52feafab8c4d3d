// Copyright 2026 Google LLC

//! The values a rewrite substitutes into stanzas.

use crate::{
    ArchiveChecksum, ArchiveIntegrity, CommitHash, DateParseError,
};
use chrono::{Datelike, NaiveDate};
use std::{fmt, str::FromStr};

const FORMAT: &str = "%Y-%m-%d";

/// A calendar date without time of day, displayed as `YYYY-MM-DD`.
///
/// ```
/// use workspace_snippets::SnippetDate;
///
/// let date: SnippetDate = "2021-04-24".parse().unwrap();
/// assert_eq!(date.to_string(), "2021-04-24");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnippetDate(NaiveDate);

impl SnippetDate {
    /// Creates a new date, checking that it exists on the calendar and has
    /// at most four year digits.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateParseError> {
        let date = if year > 9999 {
            None
        } else {
            NaiveDate::from_ymd_opt(
                i32::from(year),
                u32::from(month),
                u32::from(day),
            )
        };
        date.map(SnippetDate)
            .ok_or(DateParseError::OutOfRange { year, month, day })
    }

    /// Returns the year.
    pub fn year(&self) -> u16 {
        // Years are in 0..=9999.
        self.0.year() as u16
    }

    /// Returns the month (1 through 12).
    pub fn month(&self) -> u8 {
        self.0.month() as u8
    }

    /// Returns the day of the month (1 through 31).
    pub fn day(&self) -> u8 {
        self.0.day() as u8
    }
}

impl From<SnippetDate> for NaiveDate {
    fn from(date: SnippetDate) -> Self {
        date.0
    }
}

impl fmt::Display for SnippetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for SnippetDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields and signed years; only the exact
        // ten-character form is a date here.
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(DateParseError::InvalidFormat(s.to_owned()));
        }
        NaiveDate::parse_from_str(s, FORMAT).map(SnippetDate).map_err(
            |error| DateParseError::InvalidDate { input: s.to_owned(), error },
        )
    }
}

/// Everything needed to bring a stanza up to date.
///
/// An `UpdateContext` is resolved once per run, before any file is touched,
/// and is then shared read-only across all files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateContext {
    commit: CommitHash,
    checksum: ArchiveChecksum,
    integrity: Option<ArchiveIntegrity>,
    date: SnippetDate,
}

impl UpdateContext {
    /// Creates a context without an integrity value. `integrity` fields are
    /// left alone when rewriting with such a context.
    pub fn new(
        commit: CommitHash,
        checksum: ArchiveChecksum,
        date: SnippetDate,
    ) -> Self {
        UpdateContext { commit, checksum, integrity: None, date }
    }

    /// Sets the value substituted into `integrity` fields.
    pub fn with_integrity(mut self, integrity: ArchiveIntegrity) -> Self {
        self.integrity = Some(integrity);
        self
    }

    /// Returns the commit hash substituted into `commit`, `urls` and
    /// `strip_prefix` fields.
    pub fn commit(&self) -> CommitHash {
        self.commit
    }

    /// Returns the checksum substituted into `sha256` fields.
    pub fn checksum(&self) -> ArchiveChecksum {
        self.checksum
    }

    /// Returns the value substituted into `integrity` fields, if any.
    pub fn integrity(&self) -> Option<ArchiveIntegrity> {
        self.integrity
    }

    /// Returns the date substituted into date comments.
    pub fn date(&self) -> SnippetDate {
        self.date
    }
}
