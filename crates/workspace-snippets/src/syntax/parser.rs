// Copyright 2026 Google LLC

//! Recursive-descent parser for stanza bodies.

use super::{
    Argument, BinaryOp, Comment, Element, Entry, Expr, Sequence,
    lexer::{Punct, Token, TokenKind, tokenize},
};
use crate::SyntaxError;

/// Parses `src` as a single expression.
///
/// Comments are accepted wherever they can be attached to an element of a
/// call, list, tuple or dict (see [`Element`] and [`Sequence`]). A comment in
/// any other position is a syntax error.
///
/// ```
/// use workspace_snippets::syntax::{Expr, parse};
///
/// let expr = parse("git_override(\n    commit = \"\",\n)").unwrap();
/// assert!(matches!(expr, Expr::Call { .. }));
/// ```
pub fn parse(src: &str) -> Result<Expr, SyntaxError> {
    let mut parser = Parser { tokens: tokenize(src)?, pos: 0, last_line: 1 };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(token) => Err(parser.unexpected(token, "end of input")),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Line of the most recently consumed token.
    last_line: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_nth(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn peek_punct(&self) -> Option<Punct> {
        match self.peek() {
            Some(TokenKind::Punct(p)) => Some(*p),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        self.last_line = token.line;
        Some(token.kind)
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek_punct() == Some(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, token: &Token, expected: &'static str) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            line: token.line,
            found: token.kind.to_string(),
            expected,
        }
    }

    fn error(&self, expected: &'static str) -> SyntaxError {
        match self.tokens.get(self.pos) {
            Some(token) => self.unexpected(token, expected),
            None => SyntaxError::UnexpectedEof { expected },
        }
    }

    fn expect(
        &mut self,
        punct: Punct,
        expected: &'static str,
    ) -> Result<(), SyntaxError> {
        if self.eat(punct) { Ok(()) } else { Err(self.error(expected)) }
    }

    fn ident(&mut self, expected: &'static str) -> Result<String, SyntaxError> {
        let Some(TokenKind::Ident(name)) = self.peek() else {
            return Err(self.error(expected));
        };
        let name = name.clone();
        self.advance();
        Ok(name)
    }

    /// Consumes a run of comment tokens.
    fn comments(&mut self) -> Vec<Comment> {
        let mut comments = Vec::new();
        while let Some(TokenKind::Comment(_)) = self.peek() {
            if let Some(TokenKind::Comment(text)) = self.advance() {
                comments.push(Comment::new(text));
            }
        }
        comments
    }

    /// Consumes a comment on the same line as the last consumed token.
    fn suffix_comment(&mut self) -> Option<Comment> {
        match self.tokens.get(self.pos) {
            Some(Token { kind: TokenKind::Comment(text), line })
                if *line == self.last_line =>
            {
                let comment = Comment::new(text.clone());
                self.advance();
                Some(comment)
            }
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek_punct() {
                Some(Punct::Plus) => BinaryOp::Add,
                Some(Punct::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_punct() {
                Some(Punct::Star) => BinaryOp::Mul,
                Some(Punct::Slash) => BinaryOp::Div,
                Some(Punct::SlashSlash) => BinaryOp::FloorDiv,
                Some(Punct::Percent) => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(Punct::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek_punct() {
                Some(Punct::LParen) => {
                    let open_line = self.tokens[self.pos].line;
                    self.advance();
                    let args =
                        self.sequence(Punct::RParen, open_line, Self::argument)?;
                    expr = Expr::Call { callee: Box::new(expr), args };
                }
                Some(Punct::Dot) => {
                    self.advance();
                    let name = self.ident("attribute name")?;
                    expr = Expr::Dot { object: Box::new(expr), name };
                }
                Some(Punct::LBracket) => {
                    self.advance();
                    let index = self.expr()?;
                    self.expect(Punct::RBracket, "`]`")?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let Some(token) = self.tokens.get(self.pos) else {
            return Err(SyntaxError::UnexpectedEof { expected: "expression" });
        };
        let open_line = token.line;
        let literal = match &token.kind {
            TokenKind::Ident(name) => Some(Expr::Ident(name.clone())),
            TokenKind::Int(text) => Some(Expr::Int(text.clone())),
            TokenKind::Str(s) => Some(Expr::Str(s.clone())),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(literal);
        }
        match &token.kind {
            TokenKind::Punct(Punct::LBracket) => {
                self.advance();
                let elements =
                    self.sequence(Punct::RBracket, open_line, Self::expr)?;
                Ok(Expr::List(elements))
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.advance();
                let entries =
                    self.sequence(Punct::RBrace, open_line, Self::entry)?;
                Ok(Expr::Dict(entries))
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                self.paren(open_line)
            }
            _ => Err(self.unexpected(token, "expression")),
        }
    }

    /// Parses the rest of `(a)`, `(a,)`, `(a, b)` or `()`.
    fn paren(&mut self, open_line: usize) -> Result<Expr, SyntaxError> {
        let empty_or_commented = matches!(
            self.peek(),
            None | Some(TokenKind::Comment(_) | TokenKind::Punct(Punct::RParen))
        );
        if !empty_or_commented {
            let start = self.pos;
            let saved_line = self.last_line;
            let inner = self.expr()?;
            if self.eat(Punct::RParen) {
                return Ok(Expr::Paren(Box::new(inner)));
            }
            self.pos = start;
            self.last_line = saved_line;
        }
        let elements = self.sequence(Punct::RParen, open_line, Self::expr)?;
        Ok(Expr::Tuple(elements))
    }

    fn argument(&mut self) -> Result<Argument, SyntaxError> {
        if let (Some(TokenKind::Ident(_)), Some(TokenKind::Punct(Punct::Assign))) =
            (self.peek(), self.peek_nth(1))
        {
            let name = self.ident("parameter name")?;
            self.advance();
            let value = self.expr()?;
            return Ok(Argument::Keyword { name, value });
        }
        Ok(Argument::Positional(self.expr()?))
    }

    fn entry(&mut self) -> Result<Entry, SyntaxError> {
        let key = self.expr()?;
        self.expect(Punct::Colon, "`:`")?;
        let value = self.expr()?;
        Ok(Entry { key, value })
    }

    /// Parses comma-separated elements up to and including `close`. The
    /// opening bracket has already been consumed.
    fn sequence<T>(
        &mut self,
        close: Punct,
        open_line: usize,
        mut element: impl FnMut(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<Sequence<T>, SyntaxError> {
        let mut elements = Vec::new();
        loop {
            let before = self.comments();
            if self.eat(close) {
                return Ok(Sequence {
                    elements,
                    after: before,
                    multiline: self.last_line != open_line,
                });
            }
            let item = element(self)?;
            let comma = self.eat(Punct::Comma);
            let suffix = self.suffix_comment();
            elements.push(Element { before, item, suffix });
            if !comma {
                let after = self.comments();
                if !self.eat(close) {
                    return Err(self.error("`,` or closing bracket"));
                }
                return Ok(Sequence {
                    elements,
                    after,
                    multiline: self.last_line != open_line,
                });
            }
        }
    }
}
