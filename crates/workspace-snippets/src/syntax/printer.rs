// Copyright 2026 Google LLC

//! Canonical printer, following buildifier's layout.

use super::{Argument, Comment, Element, Entry, Expr, Sequence, StringLit};

const INDENT: usize = 4;

/// Prints `expr` in canonical form, followed by a newline.
///
/// Calls, lists, tuples and dicts that spanned several lines in the source,
/// or that carry comments, are printed one element per line with a trailing
/// comma. Everything else is printed on one line.
///
/// ```
/// use workspace_snippets::syntax::{parse, print};
///
/// let expr = parse("f(\n  a='x',b = [ 1,2 ])").unwrap();
/// assert_eq!(print(&expr), "f(\n    a = 'x',\n    b = [1, 2],\n)\n");
/// ```
pub fn print(expr: &Expr) -> String {
    let mut printer = Printer { out: String::new() };
    printer.expr(expr, 0);
    printer.out.push('\n');
    printer.out
}

struct Printer {
    out: String,
}

impl Printer {
    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }

    fn comment_line(&mut self, comment: &Comment, indent: usize) {
        self.pad(indent);
        self.out.push_str(comment.text());
        self.out.push('\n');
    }

    /// Prints `expr`, assuming the current line is indented by `indent`.
    fn expr(&mut self, expr: &Expr, indent: usize) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Int(text) => self.out.push_str(text),
            Expr::Str(s) => self.string(s),
            Expr::List(seq) => {
                self.sequence(("[", "]"), seq, indent, false, Self::expr);
            }
            Expr::Tuple(seq) => {
                self.sequence(("(", ")"), seq, indent, true, Self::expr);
            }
            Expr::Paren(inner) => {
                self.out.push('(');
                self.expr(inner, indent);
                self.out.push(')');
            }
            Expr::Dict(seq) => {
                self.sequence(("{", "}"), seq, indent, false, Self::entry);
            }
            Expr::Call { callee, args } => {
                self.expr(callee, indent);
                self.sequence(("(", ")"), args, indent, false, Self::argument);
            }
            Expr::Dot { object, name } => {
                self.expr(object, indent);
                self.out.push('.');
                self.out.push_str(name);
            }
            Expr::Index { object, index } => {
                self.expr(object, indent);
                self.out.push('[');
                self.expr(index, indent);
                self.out.push(']');
            }
            Expr::Neg(operand) => {
                self.out.push('-');
                self.expr(operand, indent);
            }
            Expr::Binary { left, op, right } => {
                self.expr(left, indent);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(right, indent);
            }
        }
    }

    fn argument(&mut self, argument: &Argument, indent: usize) {
        match argument {
            Argument::Positional(value) => self.expr(value, indent),
            Argument::Keyword { name, value } => {
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.expr(value, indent);
            }
        }
    }

    fn entry(&mut self, entry: &Entry, indent: usize) {
        self.expr(&entry.key, indent);
        self.out.push_str(": ");
        self.expr(&entry.value, indent);
    }

    fn string(&mut self, s: &StringLit) {
        if let Some(token) = s.token() {
            self.out.push_str(token);
            return;
        }
        self.out.push('"');
        for c in s.value().chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn sequence<T>(
        &mut self,
        (open, close): (&str, &str),
        seq: &Sequence<T>,
        indent: usize,
        is_tuple: bool,
        item: fn(&mut Self, &T, usize),
    ) {
        self.out.push_str(open);
        // An empty multiline sequence keeps its brackets on separate lines,
        // so a stanza like `git_override(\n)` still ends its first line with
        // the open bracket.
        if seq.elements.is_empty() && seq.after.is_empty() && !seq.multiline {
            self.out.push_str(close);
            return;
        }

        if !seq.multiline && !seq.has_comments() {
            for (i, Element { item: value, .. }) in seq.elements.iter().enumerate()
            {
                if i > 0 {
                    self.out.push_str(", ");
                }
                item(self, value, indent);
            }
            if is_tuple && seq.elements.len() == 1 {
                self.out.push(',');
            }
            self.out.push_str(close);
            return;
        }

        self.out.push('\n');
        let inner = indent + INDENT;
        for element in &seq.elements {
            for comment in &element.before {
                self.comment_line(comment, inner);
            }
            self.pad(inner);
            item(self, &element.item, inner);
            self.out.push(',');
            if let Some(comment) = &element.suffix {
                self.out.push_str("  ");
                self.out.push_str(comment.text());
            }
            self.out.push('\n');
        }
        for comment in &seq.after {
            self.comment_line(comment, inner);
        }
        self.pad(indent);
        self.out.push_str(close);
    }
}
