// Copyright 2026 Google LLC

//! Locating and rewriting Bazel workspace snippets.
//!
//! Documentation for a Bazel module often tells readers to copy a stanza
//! like this into their `WORKSPACE` or `MODULE.bazel` file:
//!
//! ```text
//! http_archive(
//!     name = "foo",
//!     urls = ["https://github.com/owner/foo/archive/〈hash〉.zip"],
//!     sha256 = "〈checksum〉",
//!     strip_prefix = "foo-〈hash〉",
//! )
//! ```
//!
//! This crate keeps such stanzas current. Given an [`UpdateContext`] (a
//! commit hash, the checksum of the matching source archive, and a date), it
//! finds every `git_override` and `http_archive` stanza in a document, even
//! when the stanza is commented out with a uniform prefix like `#` or `///`,
//! and substitutes the hash-bearing fields and any dates in comments. Text
//! outside the stanzas is left untouched.
//!
//! Rewriting happens in two stages. [`StanzaLocator`] finds stanza
//! boundaries by looking at lines of text only. Each stanza body is then
//! parsed with the [`syntax`] module, rewritten as a tree by
//! [`rewrite_expr`], and printed back canonically. A body that doesn't parse
//! is left as it is.
//!
//! The main entry point is [`rewrite_document`].
//!
//! # Examples
//!
//! ```
//! use workspace_snippets::{ArchiveChecksum, UpdateContext, rewrite_document};
//!
//! let commit = "0123456789abcdef0123456789abcdef01234567";
//! let context = UpdateContext::new(
//!     commit.parse().unwrap(),
//!     ArchiveChecksum::of(b"archive contents\n"),
//!     "2021-04-24".parse().unwrap(),
//! );
//!
//! let readme = "\
//! Add this to your WORKSPACE file:
//!
//! // http_archive(
//! //     name = \"foo\",
//! //     urls = [\"https://github.com/owner/foo/archive/.zip\"],
//! //     strip_prefix = \"foo-\",
//! // )
//! ";
//! let rewritten = rewrite_document(readme, &context).unwrap();
//! assert_eq!(rewritten.stanzas(), 1);
//! assert!(rewritten.contents().contains(&format!("//     strip_prefix = \"foo-{commit}\",")));
//!
//! // Rewriting again with the same context changes nothing.
//! let again = rewrite_document(rewritten.contents(), &context).unwrap();
//! assert_eq!(again, rewritten);
//! ```
//!
//! # Related crates
//!
//! To resolve an [`UpdateContext`] from a GitHub remote and rewrite files in
//! place, see `workspace-snippets-update`.

#![doc(html_root_url = "https://docs.rs/workspace-snippets/0.1.0")]
#![deny(missing_docs)]

mod context;
mod errors;
mod hash;
mod rewrite;
mod stanza;
pub mod syntax;

pub use context::{SnippetDate, UpdateContext};
pub use errors::{
    CommitHashParseError, DateParseError, RewriteError, SyntaxError,
    UnterminatedStanza,
};
pub use hash::{ArchiveChecksum, ArchiveIntegrity, CommitHash};
pub use rewrite::{Rewritten, rewrite_document, rewrite_expr, rewrite_stanza};
pub use stanza::{Stanza, StanzaKind, StanzaLocator};
