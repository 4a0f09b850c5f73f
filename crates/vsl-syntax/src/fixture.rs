//! Tolerant reference parser for test fixtures.
//!
//! The production tree comes from the editor's incremental parser; tests
//! need the same shapes without dragging an editor in. This module parses
//! the JS-like DSL subset the completion engine sees in practice: fluent
//! call chains, nested calls, array-literal method calls, arrow-function
//! arguments, strings and comments. It never fails: unclosed argument
//! lists, trailing dots and dangling operators all produce partial nodes,
//! which is exactly the mid-keystroke state the engine must handle.
//!
//! Compiled only for tests (`fixture` feature). Not a production parser.

use crate::kind::SyntaxKind;
use crate::tree::{NodeId, SyntaxTree, TreeBuilder};
use vsl_common::Span;

/// Parse `source` into a syntax tree. Tolerant; never panics.
pub fn parse(source: &str) -> SyntaxTree {
    let tokens = tokenize(source);
    let parser = Parser {
        tokens,
        pos: 0,
        builder: TreeBuilder::new(),
        source,
    };
    parser.script()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokKind {
    Ident,
    Number,
    Str,
    LineComment,
    BlockComment,
    Dot,
    Comma,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Arrow,
    Semi,
    Op,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokKind,
    start: u32,
    end: u32,
}

fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    let push = |tokens: &mut Vec<Token>, kind: TokKind, start: usize, end: usize| {
        tokens.push(Token {
            kind,
            start: start as u32,
            end: end as u32,
        });
    };

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        match c {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$') {
                    i += 1;
                }
                push(&mut tokens, TokKind::Ident, start, i);
            }
            b'0'..=b'9' => {
                i = scan_number(bytes, i);
                push(&mut tokens, TokKind::Number, start, i);
            }
            b'.' => {
                // `.5` is a number; any other dot is a member-access dot.
                if i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
                    i = scan_number(bytes, i + 1);
                    push(&mut tokens, TokKind::Number, start, i);
                } else {
                    i += 1;
                    push(&mut tokens, TokKind::Dot, start, i);
                }
            }
            b'"' | b'\'' | b'`' => {
                let quote = c;
                i += 1;
                while i < bytes.len() {
                    let b = bytes[i];
                    if b == b'\\' {
                        i += 2;
                        continue;
                    }
                    if b == quote {
                        i += 1;
                        break;
                    }
                    if b == b'\n' && quote != b'`' {
                        break;
                    }
                    i += 1;
                }
                push(&mut tokens, TokKind::Str, start, i.min(bytes.len()));
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                push(&mut tokens, TokKind::LineComment, start, i);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                push(&mut tokens, TokKind::BlockComment, start, i.min(bytes.len()));
            }
            b'(' => {
                i += 1;
                push(&mut tokens, TokKind::OpenParen, start, i);
            }
            b')' => {
                i += 1;
                push(&mut tokens, TokKind::CloseParen, start, i);
            }
            b'[' => {
                i += 1;
                push(&mut tokens, TokKind::OpenBracket, start, i);
            }
            b']' => {
                i += 1;
                push(&mut tokens, TokKind::CloseBracket, start, i);
            }
            b',' => {
                i += 1;
                push(&mut tokens, TokKind::Comma, start, i);
            }
            b';' => {
                i += 1;
                push(&mut tokens, TokKind::Semi, start, i);
            }
            b'=' if bytes.get(i + 1) == Some(&b'>') => {
                i += 2;
                push(&mut tokens, TokKind::Arrow, start, i);
            }
            _ => {
                i += 1;
                push(&mut tokens, TokKind::Op, start, i);
            }
        }
    }
    tokens
}

fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    i
}

struct Parser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    builder: TreeBuilder,
    source: &'s str,
}

impl Parser<'_> {
    fn script(mut self) -> SyntaxTree {
        let mut top = Vec::new();
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokKind::LineComment => top.push(self.bump_as(SyntaxKind::LineComment)),
                TokKind::BlockComment => top.push(self.bump_as(SyntaxKind::BlockComment)),
                TokKind::Semi => top.push(self.bump_as(SyntaxKind::Operator)),
                _ if self.at_expr_start() => {
                    let stmt = self.statement();
                    top.push(stmt);
                }
                // Stray closer or operator between statements; keep it so
                // spans stay covered.
                _ => {
                    let kind = leaf_kind(tok.kind);
                    top.push(self.bump_as(kind));
                }
            }
        }
        let span = Span::new(0, self.source.len() as u32);
        let root = self.builder.node_spanned(SyntaxKind::Script, span, &top);
        self.builder.finish(root)
    }

    fn statement(&mut self) -> NodeId {
        let expr = self.expression();
        let mut children = vec![expr];
        if self.peek_kind() == Some(TokKind::Semi) {
            children.push(self.bump_as(SyntaxKind::Operator));
        }
        self.builder.node(SyntaxKind::ExpressionStatement, &children)
    }

    fn expression(&mut self) -> NodeId {
        let mut lhs = self.unary();
        while self.peek_kind() == Some(TokKind::Op) {
            let op = self.bump_as(SyntaxKind::Operator);
            if self.at_expr_start() {
                let rhs = self.unary();
                lhs = self.builder.node(SyntaxKind::Other, &[lhs, op, rhs]);
            } else {
                // Dangling operator mid-keystroke: `time*2.5)*`
                lhs = self.builder.node(SyntaxKind::Other, &[lhs, op]);
            }
        }
        lhs
    }

    fn unary(&mut self) -> NodeId {
        if self.peek_kind() == Some(TokKind::Op) {
            let op = self.bump_as(SyntaxKind::Operator);
            if self.at_expr_start() {
                let operand = self.unary();
                return self.builder.node(SyntaxKind::Other, &[op, operand]);
            }
            return op;
        }
        self.postfix()
    }

    /// A primary followed by any run of `.name` accesses and `(...)` calls.
    /// This is where fluent chains take shape, newlines included: the token
    /// stream carries no line breaks, so `osc(30)\n.mult(x)` chains onto
    /// the same expression just as the editor's parser produces it.
    fn postfix(&mut self) -> NodeId {
        let mut expr = self.primary();
        loop {
            match self.peek_kind() {
                Some(TokKind::Dot) => {
                    let dot = self.bump_as(SyntaxKind::Dot);
                    if self.peek_kind() == Some(TokKind::Ident) {
                        let name = self.bump_as(SyntaxKind::PropertyName);
                        expr = self
                            .builder
                            .node(SyntaxKind::MemberExpression, &[expr, dot, name]);
                    } else {
                        // Trailing dot: `osc(30).`
                        expr = self.builder.node(SyntaxKind::MemberExpression, &[expr, dot]);
                    }
                }
                Some(TokKind::OpenParen) => {
                    let args = self.arg_list();
                    expr = self.builder.node(SyntaxKind::CallExpression, &[expr, args]);
                }
                _ => break,
            }
        }
        expr
    }

    /// Argument list including parens and commas as direct children, the
    /// shape the comma-counting heuristic depends on. Unclosed lists end at
    /// end of input.
    fn arg_list(&mut self) -> NodeId {
        let open = self.bump_as(SyntaxKind::OpenParen);
        let mut children = vec![open];
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokKind::CloseParen) => {
                    children.push(self.bump_as(SyntaxKind::CloseParen));
                    break;
                }
                Some(TokKind::Comma) => children.push(self.bump_as(SyntaxKind::Comma)),
                Some(TokKind::LineComment) => {
                    children.push(self.bump_as(SyntaxKind::LineComment));
                }
                Some(TokKind::BlockComment) => {
                    children.push(self.bump_as(SyntaxKind::BlockComment));
                }
                Some(_) if self.at_expr_start() => children.push(self.expression()),
                Some(kind) => {
                    let mapped = leaf_kind(kind);
                    children.push(self.bump_as(mapped));
                }
            }
        }
        self.builder.node(SyntaxKind::ArgList, &children)
    }

    fn primary(&mut self) -> NodeId {
        match self.peek_kind() {
            Some(TokKind::Number) => self.bump_as(SyntaxKind::Number),
            Some(TokKind::Str) => self.bump_as(SyntaxKind::String),
            Some(TokKind::Ident) => {
                if self.peek_kind_at(1) == Some(TokKind::Arrow) {
                    return self.arrow_from_ident();
                }
                self.bump_as(SyntaxKind::VariableName)
            }
            Some(TokKind::OpenBracket) => self.array(),
            Some(TokKind::OpenParen) => {
                if self.paren_starts_arrow() {
                    self.arrow_from_parens()
                } else {
                    self.paren_group()
                }
            }
            Some(TokKind::LineComment) => self.bump_as(SyntaxKind::LineComment),
            Some(TokKind::BlockComment) => self.bump_as(SyntaxKind::BlockComment),
            Some(kind) => {
                let mapped = leaf_kind(kind);
                self.bump_as(mapped)
            }
            // Callers check at_expr_start, but stay safe at end of input.
            None => {
                let at = self.source.len() as u32;
                self.builder
                    .node_spanned(SyntaxKind::Other, Span::empty(at), &[])
            }
        }
    }

    fn array(&mut self) -> NodeId {
        let open = self.bump_as(SyntaxKind::Operator);
        let mut children = vec![open];
        loop {
            match self.peek_kind() {
                None => break,
                Some(TokKind::CloseBracket) => {
                    children.push(self.bump_as(SyntaxKind::Operator));
                    break;
                }
                Some(TokKind::Comma) => children.push(self.bump_as(SyntaxKind::Comma)),
                Some(_) if self.at_expr_start() => children.push(self.expression()),
                Some(kind) => {
                    let mapped = leaf_kind(kind);
                    children.push(self.bump_as(mapped));
                }
            }
        }
        self.builder.node(SyntaxKind::ArrayExpression, &children)
    }

    fn paren_group(&mut self) -> NodeId {
        let open = self.bump_as(SyntaxKind::OpenParen);
        let mut children = vec![open];
        if self.at_expr_start() {
            children.push(self.expression());
        }
        if self.peek_kind() == Some(TokKind::CloseParen) {
            children.push(self.bump_as(SyntaxKind::CloseParen));
        }
        self.builder.node(SyntaxKind::Other, &children)
    }

    /// `x => expr`
    fn arrow_from_ident(&mut self) -> NodeId {
        let param = self.bump_as(SyntaxKind::VariableName);
        let arrow = self.bump_as(SyntaxKind::Operator);
        let mut children = vec![param, arrow];
        if self.at_expr_start() {
            children.push(self.expression());
        }
        self.builder.node(SyntaxKind::ArrowFunction, &children)
    }

    /// `() => expr`, `(a, b) => expr`
    fn arrow_from_parens(&mut self) -> NodeId {
        let mut children = vec![self.bump_as(SyntaxKind::OpenParen)];
        loop {
            match self.peek_kind() {
                Some(TokKind::CloseParen) => {
                    children.push(self.bump_as(SyntaxKind::CloseParen));
                    break;
                }
                Some(TokKind::Comma) => children.push(self.bump_as(SyntaxKind::Comma)),
                Some(TokKind::Ident) => children.push(self.bump_as(SyntaxKind::VariableName)),
                _ => break,
            }
        }
        if self.peek_kind() == Some(TokKind::Arrow) {
            children.push(self.bump_as(SyntaxKind::Operator));
        }
        if self.at_expr_start() {
            children.push(self.expression());
        }
        self.builder.node(SyntaxKind::ArrowFunction, &children)
    }

    /// Whether the `(` at the current position opens an arrow-function
    /// parameter list: scan to its matching `)` and look for `=>`.
    fn paren_starts_arrow(&self) -> bool {
        let mut depth = 0usize;
        let mut idx = self.pos;
        while let Some(tok) = self.tokens.get(idx) {
            match tok.kind {
                TokKind::OpenParen => depth += 1,
                TokKind::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.tokens.get(idx + 1).map(|t| t.kind) == Some(TokKind::Arrow);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        false
    }

    fn at_expr_start(&self) -> bool {
        match self.peek_kind() {
            Some(
                TokKind::Ident
                | TokKind::Number
                | TokKind::Str
                | TokKind::OpenBracket
                | TokKind::OpenParen
                | TokKind::LineComment
                | TokKind::BlockComment,
            ) => true,
            Some(TokKind::Op) => {
                // Unary minus / not.
                let tok = self.tokens[self.pos];
                matches!(self.source.as_bytes().get(tok.start as usize), Some(b'-' | b'!'))
            }
            _ => false,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<TokKind> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    fn bump_as(&mut self, kind: SyntaxKind) -> NodeId {
        let tok = self.tokens[self.pos];
        self.pos += 1;
        self.builder.token(kind, tok.start, tok.end)
    }
}

/// Leaf kind for a token consumed outside its usual grammar position.
fn leaf_kind(kind: TokKind) -> SyntaxKind {
    match kind {
        TokKind::Ident => SyntaxKind::VariableName,
        TokKind::Number => SyntaxKind::Number,
        TokKind::Str => SyntaxKind::String,
        TokKind::LineComment => SyntaxKind::LineComment,
        TokKind::BlockComment => SyntaxKind::BlockComment,
        TokKind::Dot => SyntaxKind::Dot,
        TokKind::Comma => SyntaxKind::Comma,
        TokKind::OpenParen => SyntaxKind::OpenParen,
        TokKind::CloseParen => SyntaxKind::CloseParen,
        TokKind::Arrow | TokKind::Semi | TokKind::Op | TokKind::OpenBracket | TokKind::CloseBracket => {
            SyntaxKind::Operator
        }
    }
}
