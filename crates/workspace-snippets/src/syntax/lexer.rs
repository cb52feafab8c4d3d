// Copyright 2026 Google LLC

//! Tokenizer for stanza bodies.
//!
//! Newlines are not tokens: stanza bodies only ever consist of a single call
//! expression, and inside brackets Starlark ignores line breaks.

use super::StringLit;
use crate::SyntaxError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Punct {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Assign,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
}

impl Punct {
    fn as_str(&self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Colon => ":",
            Punct::Assign => "=",
            Punct::Dot => ".",
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::SlashSlash => "//",
            Punct::Percent => "%",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    Ident(String),
    Int(String),
    Str(StringLit),
    Comment(String),
    Punct(Punct),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::Int(text) => write!(f, "integer `{text}`"),
            TokenKind::Str(_) => f.write_str("string literal"),
            TokenKind::Comment(_) => f.write_str("comment"),
            TokenKind::Punct(p) => write!(f, "`{}`", p.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    /// 1-based line of the first character of the token.
    pub(super) line: usize,
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer { src, pos: 0, line: 1 };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '\\' && self.peek_at(1) == Some('\n') {
                // Explicit line continuation.
                self.bump();
                self.bump();
            } else {
                break;
            }
        }

        let line = self.line;
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let kind = match c {
            '#' => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
                TokenKind::Comment(self.src[start..self.pos].to_owned())
            }
            '"' | '\'' => self.string(start, c, false)?,
            'r' | 'R' => match self.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.bump();
                    self.string(start, quote, true)?
                }
                _ => self.ident(start),
            },
            c if c.is_alphabetic() || c == '_' => self.ident(start),
            c if c.is_ascii_digit() => {
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.bump();
                }
                TokenKind::Int(self.src[start..self.pos].to_owned())
            }
            '/' if self.peek() == Some('/') => {
                self.bump();
                TokenKind::Punct(Punct::SlashSlash)
            }
            _ => {
                let punct = match c {
                    '(' => Punct::LParen,
                    ')' => Punct::RParen,
                    '[' => Punct::LBracket,
                    ']' => Punct::RBracket,
                    '{' => Punct::LBrace,
                    '}' => Punct::RBrace,
                    ',' => Punct::Comma,
                    ':' => Punct::Colon,
                    '=' => Punct::Assign,
                    '.' => Punct::Dot,
                    '+' => Punct::Plus,
                    '-' => Punct::Minus,
                    '*' => Punct::Star,
                    '/' => Punct::Slash,
                    '%' => Punct::Percent,
                    ch => return Err(SyntaxError::UnexpectedChar { line, ch }),
                };
                TokenKind::Punct(punct)
            }
        };
        Ok(Some(Token { kind, line }))
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        TokenKind::Ident(self.src[start..self.pos].to_owned())
    }

    /// Lexes the rest of a string literal whose opening quote (and optional
    /// `r` prefix) starting at `start` has been consumed.
    fn string(
        &mut self,
        start: usize,
        quote: char,
        raw: bool,
    ) -> Result<TokenKind, SyntaxError> {
        let line = self.line;
        let triple =
            self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(SyntaxError::UnterminatedString { line });
            };
            match c {
                '\n' if !triple => {
                    return Err(SyntaxError::UnterminatedString { line });
                }
                c if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.peek() == Some(quote)
                        && self.peek_at(1) == Some(quote)
                    {
                        self.bump();
                        self.bump();
                        break;
                    }
                    value.push(c);
                }
                '\\' => {
                    let Some(escaped) = self.bump() else {
                        return Err(SyntaxError::UnterminatedString { line });
                    };
                    if raw {
                        value.push('\\');
                        value.push(escaped);
                        continue;
                    }
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' | '\'' | '"' => value.push(escaped),
                        '\n' => {}
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                c => value.push(c),
            }
        }

        let token = self.src[start..self.pos].to_owned();
        Ok(TokenKind::Str(StringLit::with_token(value, token)))
    }
}
