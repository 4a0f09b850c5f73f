//! Cursor-context analysis.
//!
//! Given a syntax tree, the cursor offset and the raw text, work out what
//! the cursor is syntactically doing: inside which call's argument list and
//! at which position, after a member-access dot, inside a fluent chain, or
//! at a fresh statement position. The tree is usually mid-keystroke and
//! broken, so every signal here is a heuristic with a safe default; the
//! analyzer never fails, it only degrades to "no context".

use tracing::debug;
use vsl_common::LineMap;
use vsl_syntax::{Bias, NodeId, SyntaxKind, SyntaxTree};

/// Parent walks are bounded by nesting depth; this is a backstop against a
/// malformed parent table, not an expected limit.
const MAX_WALK_DEPTH: usize = 100;

/// The partial identifier (or dot run) immediately before the cursor. This
/// is the span a completion replaces and the prefix candidates are matched
/// against. An empty token at a statement position is the normal state, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub text: String,
    pub from: u32,
    pub to: u32,
}

/// Everything the suggestion builder needs to know about the cursor.
/// Computed fresh on every completion request; nothing is cached across
/// keystrokes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CursorContext {
    /// The cursor sits inside some call's argument list, even when the
    /// callee could not be named.
    pub in_parameters: bool,
    /// Name of the innermost unclosed call containing the cursor.
    pub enclosing_function: Option<String>,
    /// Zero-based argument position within that call, counted by the
    /// call's own top-level commas before the cursor.
    pub parameter_index: u32,
    /// The cursor follows a member-access dot.
    pub after_dot: bool,
    /// The cursor's ancestor chain passes through a fluent chain,
    /// independent of `after_dot`.
    pub in_chain: bool,
    /// Name of the nearest already-completed call before the cursor, when
    /// one is resolvable. Drives the output-sink suppression rule.
    pub last_call_name: Option<String>,
    /// The partial token being typed.
    pub token: Token,
    /// The cursor rests inside a string or comment; no completions apply.
    pub suppressed: bool,
}

impl CursorContext {
    /// The safe default: no context at all. The builder turns this into
    /// statement-start suggestions.
    fn statement_start(token: Token) -> Self {
        CursorContext {
            in_parameters: false,
            enclosing_function: None,
            parameter_index: 0,
            after_dot: false,
            in_chain: false,
            last_call_name: None,
            token,
            suppressed: false,
        }
    }
}

/// An open call found around the cursor: the callee name when resolvable,
/// and the argument index the cursor is at.
struct CallSite {
    name: Option<String>,
    index: u32,
}

/// Context analyzer over one immutable tree/text snapshot.
pub struct ContextAnalyzer<'a> {
    tree: &'a SyntaxTree,
    line_map: &'a LineMap,
    source_text: &'a str,
}

impl<'a> ContextAnalyzer<'a> {
    pub fn new(tree: &'a SyntaxTree, line_map: &'a LineMap, source_text: &'a str) -> Self {
        Self {
            tree,
            line_map,
            source_text,
        }
    }

    /// Analyze the cursor position. Pure and infallible: identical inputs
    /// produce identical contexts, and malformed trees degrade to the
    /// statement-start default rather than failing.
    pub fn analyze(&self, offset: u32) -> CursorContext {
        let mut offset = offset.min(self.source_text.len() as u32);
        // An offset landing inside a multi-byte character floors to the
        // character's start; all later slicing assumes a valid boundary.
        while offset > 0 && !self.source_text.is_char_boundary(offset as usize) {
            offset -= 1;
        }
        let token = self.trailing_token(offset);

        // Resolve three nodes, leaning left so that a token ending at the
        // cursor wins over whatever starts there: the node right before the
        // cursor (skipping same-line blanks), the node before that one, and
        // the node at the cursor itself.
        let probe = self.probe_offset(offset);
        let node_before = self.tree.resolve_at(probe, Bias::Left);
        let node_prior = self
            .tree
            .resolve_at(self.tree.span(node_before).start, Bias::Left);
        let node_at = self.tree.resolve_at(offset, Bias::Enclosing);
        debug!(
            node_at = ?self.tree.kind(node_at),
            node_before = ?self.tree.kind(node_before),
            node_prior = ?self.tree.kind(node_prior),
            token = %token.text,
            "resolved cursor nodes"
        );

        if self.in_no_completion_context(node_at, node_before, offset) {
            debug!("cursor inside string or comment, suppressing");
            let mut ctx = CursorContext::statement_start(token);
            ctx.suppressed = true;
            return ctx;
        }

        // Primary: tree walk to the innermost unclosed argument list.
        // Fallback: text scan, for the moments the parser has not caught up
        // with the keystroke.
        let call_site = self
            .enclosing_call(node_at, offset)
            .or_else(|| self.enclosing_call(node_before, offset))
            .or_else(|| self.scan_call_context(offset));
        let (in_parameters, enclosing_function, parameter_index) = match call_site {
            Some(site) => {
                debug!(name = ?site.name, index = site.index, "enclosing call");
                (true, site.name, site.index)
            }
            None => (false, None, 0),
        };

        let after_dot = self.after_dot(node_before, node_prior, &token, offset);
        let in_chain = self.in_chain(node_before);
        let last_call_name = self
            .last_call(node_before)
            .or_else(|| self.trailing_closed_call(offset));
        debug!(after_dot, in_chain, ?last_call_name, "cursor signals");

        CursorContext {
            in_parameters,
            enclosing_function,
            parameter_index,
            after_dot,
            in_chain,
            last_call_name,
            token,
            suppressed: false,
        }
    }

    /// Longest trailing run of identifier characters and dots before the
    /// cursor. Empty when the cursor follows whitespace or punctuation.
    fn trailing_token(&self, offset: u32) -> Token {
        let bytes = self.source_text.as_bytes();
        let end = offset as usize;
        let mut start = end;
        while start > 0 {
            let b = bytes[start - 1];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.' {
                start -= 1;
            } else {
                break;
            }
        }
        Token {
            text: self.source_text[start..end].to_string(),
            from: start as u32,
            to: offset,
        }
    }

    /// Offset of the last non-blank character on the cursor's line, so a
    /// trailing space after a dot still resolves to the dot. Newlines are
    /// not crossed: a fresh line is a fresh statement position.
    fn probe_offset(&self, offset: u32) -> u32 {
        let bytes = self.source_text.as_bytes();
        let mut probe = offset as usize;
        while probe > 0 && matches!(bytes[probe - 1], b' ' | b'\t') {
            probe -= 1;
        }
        probe as u32
    }

    // ------------------------------------------------------------------
    // Enclosing call
    // ------------------------------------------------------------------

    fn enclosing_call(&self, start: NodeId, offset: u32) -> Option<CallSite> {
        let args = self.enclosing_arg_list(start, offset)?;
        // Count the list's own commas before the cursor. Commas of nested
        // calls live in the nested list's child row and never show up here.
        let index = self
            .tree
            .children(args)
            .filter(|&child| self.tree.kind(child) == Some(SyntaxKind::Comma))
            .filter(|&child| self.tree.span(child).start < offset)
            .count() as u32;
        Some(CallSite {
            name: self.call_name(args),
            index,
        })
    }

    /// Walk parents to the nearest argument list that is still open at the
    /// cursor. A list whose closing paren sits at or before the cursor is
    /// already finished; the walk continues to the next one out.
    fn enclosing_arg_list(&self, start: NodeId, offset: u32) -> Option<NodeId> {
        let mut current = start;
        let mut depth = 0;
        while !current.is_none() && depth < MAX_WALK_DEPTH {
            if self.tree.kind(current) == Some(SyntaxKind::ArgList)
                && !self.arg_list_closed_before(current, offset)
            {
                return Some(current);
            }
            current = self.tree.parent(current);
            depth += 1;
        }
        None
    }

    fn arg_list_closed_before(&self, args: NodeId, offset: u32) -> bool {
        let last = self.tree.last_child(args);
        self.tree.kind(last) == Some(SyntaxKind::CloseParen) && offset >= self.tree.span(last).end
    }

    /// Name the function owning an argument list.
    fn call_name(&self, args: NodeId) -> Option<String> {
        let call = self.tree.parent(args);
        if self.tree.kind(call) != Some(SyntaxKind::CallExpression) {
            return self.name_from_chain(args);
        }
        if let Some(name) = self.callee_name(call) {
            return Some(name);
        }
        // Some recovery shapes hang the list off the base call of a chain;
        // the method name then lives on the member expression wrapping it.
        let call_parent = self.tree.parent(call);
        if self.tree.kind(call_parent) == Some(SyntaxKind::MemberExpression) {
            let prop = self.tree.last_child(call_parent);
            if self.tree.kind(prop).is_some_and(|k| k.is_name()) {
                return Some(self.tree.text(prop, self.source_text).to_string());
            }
        }
        self.name_from_chain(call)
    }

    /// A call's own name: a plain `osc(...)` has a variable-name callee, a
    /// chained `.color(...)` has a member-expression callee whose property
    /// names the method.
    fn callee_name(&self, call: NodeId) -> Option<String> {
        let callee = self.tree.first_child(call);
        match self.tree.kind(callee) {
            Some(SyntaxKind::VariableName) => {
                Some(self.tree.text(callee, self.source_text).to_string())
            }
            Some(SyntaxKind::MemberExpression) => {
                let prop = self.tree.last_child(callee);
                if self.tree.kind(prop) == Some(SyntaxKind::PropertyName) {
                    Some(self.tree.text(prop, self.source_text).to_string())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Last-resort name resolution: climb through the surrounding chain and
    /// take the first property or callee name that resolves.
    fn name_from_chain(&self, start: NodeId) -> Option<String> {
        let mut current = start;
        let mut depth = 0;
        while !current.is_none() && depth < MAX_WALK_DEPTH {
            match self.tree.kind(current) {
                Some(SyntaxKind::MemberExpression) => {
                    let prop = self.tree.last_child(current);
                    if self.tree.kind(prop).is_some_and(|k| k.is_name()) {
                        return Some(self.tree.text(prop, self.source_text).to_string());
                    }
                }
                Some(SyntaxKind::CallExpression) => {
                    if let Some(name) = self.callee_name(current) {
                        return Some(name);
                    }
                }
                _ => {}
            }
            current = self.tree.parent(current);
            depth += 1;
        }
        None
    }

    /// Text-scanning fallback: find the innermost unclosed named call by
    /// bracket counting, ignoring strings and comments. Used when the tree
    /// has no argument list around the cursor, which happens transiently
    /// while the parser digests a keystroke.
    fn scan_call_context(&self, offset: u32) -> Option<CallSite> {
        let text = &self.source_text[..offset as usize];
        let bytes = text.as_bytes();
        // (callee byte range if the group opened a named call, comma count)
        let mut stack: Vec<(Option<(usize, usize)>, u32)> = Vec::new();
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                    let start = i;
                    while i < bytes.len() && is_ident_byte(bytes[i]) {
                        i += 1;
                    }
                    if bytes.get(i) == Some(&b'(') {
                        stack.push((Some((start, i)), 0));
                        i += 1;
                    }
                }
                b'(' => {
                    stack.push((None, 0));
                    i += 1;
                }
                b')' => {
                    stack.pop();
                    i += 1;
                }
                b',' => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    i += 1;
                }
                quote @ (b'\'' | b'"' | b'`') => {
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        i += if bytes[i] == b'\\' { 2 } else { 1 };
                    }
                    i += 1;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i += 2;
                    while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                        i += 1;
                    }
                    i = (i + 2).min(bytes.len());
                }
                _ => i += 1,
            }
        }
        // The innermost open group with a name wins; bare paren groups in
        // between keep their commas to themselves.
        for &(name, commas) in stack.iter().rev() {
            if let Some((start, end)) = name {
                debug!(name = &text[start..end], index = commas, "text-scan call context");
                return Some(CallSite {
                    name: Some(text[start..end].to_string()),
                    index: commas,
                });
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Dot / chain signals
    // ------------------------------------------------------------------

    /// Whether the cursor follows a member-access dot. Four independent
    /// signals, OR-combined: the parser may not have incorporated a
    /// just-typed dot into the tree yet, so no single one is reliable.
    fn after_dot(&self, node_before: NodeId, node_prior: NodeId, token: &Token, offset: u32) -> bool {
        if self.tree.kind(node_before) == Some(SyntaxKind::Dot) {
            return true;
        }
        if self.tree.kind(node_prior) == Some(SyntaxKind::Dot)
            && self.tree.kind(node_before).is_some_and(|k| k.is_name())
        {
            return true;
        }
        if token.text.starts_with('.') {
            return true;
        }
        // A dot right after a completed call: the member expression exists
        // but its property is still missing.
        self.tree.kind(node_before) == Some(SyntaxKind::MemberExpression)
            && self.line_prefix(offset).trim_end().ends_with('.')
    }

    /// Whether the cursor's ancestor path runs through a fluent chain: any
    /// call/member/property ancestor counts, as does a statement that is a
    /// continuation line starting with a dot.
    fn in_chain(&self, start: NodeId) -> bool {
        let mut current = start;
        let mut depth = 0;
        while !current.is_none() && depth < MAX_WALK_DEPTH {
            match self.tree.kind(current) {
                Some(kind) if kind.is_chain_link() => return true,
                Some(SyntaxKind::ExpressionStatement) => {
                    if self
                        .tree
                        .text(current, self.source_text)
                        .starts_with('.')
                    {
                        return true;
                    }
                }
                _ => {}
            }
            current = self.tree.parent(current);
            depth += 1;
        }
        false
    }

    /// Name of the nearest completed call or member access on the ancestor
    /// path, mirroring the chain walk the dot suggestions key off.
    fn last_call(&self, start: NodeId) -> Option<String> {
        let mut current = start;
        let mut depth = 0;
        while !current.is_none() && depth < MAX_WALK_DEPTH {
            match self.tree.kind(current) {
                Some(SyntaxKind::CallExpression) => return self.callee_name(current),
                Some(SyntaxKind::MemberExpression) => {
                    let prop = self.tree.last_child(current);
                    if self.tree.kind(prop).is_some_and(|k| k.is_name()) {
                        return Some(self.tree.text(prop, self.source_text).to_string());
                    }
                    return None;
                }
                _ => {}
            }
            current = self.tree.parent(current);
            depth += 1;
        }
        None
    }

    /// Text fallback for the completed-call name: a `)` just before the
    /// cursor (statement terminators aside) is matched back to its opener
    /// and the identifier in front of it.
    fn trailing_closed_call(&self, offset: u32) -> Option<String> {
        let text = self.source_text[..offset as usize]
            .trim_end()
            .trim_end_matches(';')
            .trim_end();
        if !text.ends_with(')') {
            return None;
        }
        let bytes = text.as_bytes();
        let mut depth = 0i32;
        let mut i = text.len();
        while i > 0 {
            i -= 1;
            match bytes[i] {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = i;
                        let mut start = i;
                        while start > 0 && is_ident_byte(bytes[start - 1]) {
                            start -= 1;
                        }
                        if start < end {
                            return Some(text[start..end].to_string());
                        }
                        return None;
                    }
                }
                _ => {}
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Suppression
    // ------------------------------------------------------------------

    /// Whether the cursor rests inside a string or comment, where offering
    /// completions is noise. Checks the resolved nodes first and falls back
    /// to text scanning for trees that dropped the tokens.
    fn in_no_completion_context(&self, node_at: NodeId, node_before: NodeId, offset: u32) -> bool {
        for id in [node_at, node_before] {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let span = node.span;
            match node.kind {
                SyntaxKind::LineComment => {
                    if span.start < offset && offset <= span.end {
                        return true;
                    }
                }
                SyntaxKind::BlockComment => {
                    let closed = span.text(self.source_text).ends_with("*/");
                    if span.contains_inner(offset) || (offset == span.end && !closed) {
                        return true;
                    }
                }
                SyntaxKind::String => {
                    let closed = is_terminated_string(span.text(self.source_text));
                    if span.contains_inner(offset) || (offset == span.end && !closed) {
                        return true;
                    }
                }
                _ => {}
            }
        }

        // Text fallback: `//` earlier on the line (outside quotes), or an
        // unclosed `/*` anywhere before the cursor.
        let line_prefix = self.line_prefix(offset);
        if let Some(comment_pos) = line_prefix.find("//") {
            let before = &line_prefix[..comment_pos];
            let balanced = ['\'', '"', '`']
                .iter()
                .all(|&q| before.chars().filter(|&c| c == q).count() % 2 == 0);
            if balanced {
                return true;
            }
        }
        let before_cursor = &self.source_text[..offset as usize];
        if let Some(block_start) = before_cursor.rfind("/*")
            && !before_cursor[block_start + 2..].contains("*/")
        {
            return true;
        }
        false
    }

    /// The cursor line's text up to the cursor.
    fn line_prefix(&self, offset: u32) -> &str {
        let line_start = self
            .line_map
            .line_start(self.line_map.line_at(offset))
            .unwrap_or(0);
        self.source_text
            .get(line_start as usize..offset as usize)
            .unwrap_or("")
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// A string literal is terminated when its closing quote is present and not
/// escaped.
fn is_terminated_string(text: &str) -> bool {
    let bytes = text.as_bytes();
    let Some(&quote) = bytes.first() else {
        return false;
    };
    if bytes.len() < 2 || bytes[bytes.len() - 1] != quote {
        return false;
    }
    // Count the backslashes in front of the closing quote.
    let mut backslashes = 0;
    for &b in bytes[1..bytes.len() - 1].iter().rev() {
        if b == b'\\' {
            backslashes += 1;
        } else {
            break;
        }
    }
    backslashes % 2 == 0
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod context_tests;
