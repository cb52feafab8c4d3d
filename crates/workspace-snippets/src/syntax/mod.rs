// Copyright 2026 Google LLC

//! A minimal parser and canonical printer for the subset of Starlark that
//! appears in stanza bodies: calls with keyword arguments, string and integer
//! literals, lists, dicts, and line comments.
//!
//! Comments are kept in the tree, attached to the elements of calls, lists
//! and dicts, so they survive a parse/print round trip.

mod lexer;
mod parser;
mod printer;

pub use parser::parse;
pub use printer::print;

/// A line comment, including its leading `#`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    /// Creates a comment. Trailing whitespace is dropped.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        text.truncate(text.trim_end().len());
        Comment { text }
    }

    /// Returns the comment text, including the leading `#`.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A string literal.
///
/// The original token is remembered so that a string whose value hasn't
/// changed prints exactly as it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringLit {
    value: String,
    token: Option<String>,
}

impl StringLit {
    /// Creates a string literal without an original token. It prints
    /// double-quoted.
    pub fn new(value: impl Into<String>) -> Self {
        StringLit { value: value.into(), token: None }
    }

    pub(crate) fn with_token(value: String, token: String) -> Self {
        StringLit { value, token: Some(token) }
    }

    /// Returns the decoded value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns a literal with the given value. If the value is unchanged the
    /// original token is kept.
    pub fn with_value(&self, value: String) -> Self {
        if value == self.value {
            self.clone()
        } else {
            StringLit::new(value)
        }
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// An element of a [`Sequence`] together with its comments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element<T> {
    /// Comments on their own lines before the element.
    pub before: Vec<Comment>,
    /// The element itself.
    pub item: T,
    /// A comment on the same line, after the element.
    pub suffix: Option<Comment>,
}

impl<T> Element<T> {
    /// Creates an element without comments.
    pub fn new(item: T) -> Self {
        Element { before: Vec::new(), item, suffix: None }
    }
}

/// The bracketed contents of a call, list, tuple or dict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence<T> {
    /// The elements, in order.
    pub elements: Vec<Element<T>>,
    /// Comments between the last element and the closing bracket.
    pub after: Vec<Comment>,
    /// Whether the brackets were on different lines in the source.
    pub multiline: bool,
}

impl<T> Sequence<T> {
    /// Whether any element or the sequence itself carries a comment.
    pub fn has_comments(&self) -> bool {
        !self.after.is_empty()
            || self
                .elements
                .iter()
                .any(|e| !e.before.is_empty() || e.suffix.is_some())
    }
}

/// A call argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    /// `value`
    Positional(Expr),
    /// `name = value`
    Keyword {
        /// The parameter name.
        name: String,
        /// The argument value.
        value: Expr,
    },
}

/// A `key: value` dict entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The key.
    pub key: Expr,
    /// The value.
    pub value: Expr,
}

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Rem,
}

impl BinaryOp {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Rem => "%",
        }
    }
}

/// An expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// An identifier such as `True` or `name`.
    Ident(String),
    /// An integer literal, as written.
    Int(String),
    /// A string literal.
    Str(StringLit),
    /// `[a, b]`
    List(Sequence<Expr>),
    /// `(a, b)`, `(a,)` or `()`
    Tuple(Sequence<Expr>),
    /// `(a)`
    Paren(Box<Expr>),
    /// `{k: v}`
    Dict(Sequence<Entry>),
    /// `callee(args)`
    Call {
        /// The called expression, usually an identifier.
        callee: Box<Expr>,
        /// The arguments.
        args: Sequence<Argument>,
    },
    /// `object.name`
    Dot {
        /// The object.
        object: Box<Expr>,
        /// The attribute name.
        name: String,
    },
    /// `object[index]`
    Index {
        /// The indexed object.
        object: Box<Expr>,
        /// The index.
        index: Box<Expr>,
    },
    /// `-operand`
    Neg(Box<Expr>),
    /// `left op right`
    Binary {
        /// The left operand.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// The right operand.
        right: Box<Expr>,
    },
}
