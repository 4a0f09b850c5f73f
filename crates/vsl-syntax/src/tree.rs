//! Arena-backed syntax tree with parent links and offset resolution.
//!
//! Nodes are stored flat and addressed by `NodeId`. Parent and sibling
//! links live in a side table, so the tree itself is plain owned data with
//! no reference cycles; the completion engine only ever borrows it for the
//! duration of one request.

use crate::kind::SyntaxKind;
use vsl_common::Span;

/// Index of a node in a `SyntaxTree`. `NodeId::NONE` is the null sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// A single syntax node: its kind and the source range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub kind: SyntaxKind,
    pub span: Span,
}

/// Parent and sibling links, kept apart from the node payload.
#[derive(Debug, Clone, Copy)]
struct NodeLinks {
    parent: NodeId,
    first_child: NodeId,
    last_child: NodeId,
    next_sibling: NodeId,
}

impl Default for NodeLinks {
    fn default() -> Self {
        NodeLinks {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// How `SyntaxTree::resolve_at` breaks ties at node boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Prefer the node ending at or before the offset. This is the bias a
    /// completion query wants: typing `osc(` must resolve into the argument
    /// list being opened, not whatever starts at the cursor.
    Left,
    /// Innermost node whose span touches the offset on either side.
    Enclosing,
}

/// An immutable snapshot of one parse, produced by the external parser via
/// [`TreeBuilder`] and consumed read-only by the completion engine.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    links: Vec<NodeLinks>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// The node's kind, or `None` for the null sentinel.
    pub fn kind(&self, id: NodeId) -> Option<SyntaxKind> {
        self.get(id).map(|node| node.kind)
    }

    /// The node's span, or an empty span for the null sentinel.
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|node| node.span).unwrap_or_default()
    }

    /// The source text covered by the node.
    pub fn text<'a>(&self, id: NodeId, source: &'a str) -> &'a str {
        match self.get(id) {
            Some(node) => node.span.text(source),
            None => "",
        }
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        self.link(id).map(|l| l.parent).unwrap_or(NodeId::NONE)
    }

    pub fn first_child(&self, id: NodeId) -> NodeId {
        self.link(id).map(|l| l.first_child).unwrap_or(NodeId::NONE)
    }

    pub fn last_child(&self, id: NodeId) -> NodeId {
        self.link(id).map(|l| l.last_child).unwrap_or(NodeId::NONE)
    }

    pub fn next_sibling(&self, id: NodeId) -> NodeId {
        self.link(id).map(|l| l.next_sibling).unwrap_or(NodeId::NONE)
    }

    /// Iterate the node's direct children, left to right.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Resolve the innermost node at `offset` under the given bias.
    ///
    /// Descends from the root, at each level picking the child whose span
    /// matches the offset; stops where no child matches, so an offset in
    /// the whitespace between tokens resolves to the covering node. Always
    /// returns a valid id (the root in the worst case).
    pub fn resolve_at(&self, offset: u32, bias: Bias) -> NodeId {
        let mut current = self.root;
        loop {
            let next = match bias {
                Bias::Left => self.pick_child_left(current, offset),
                Bias::Enclosing => self.pick_child_enclosing(current, offset),
            };
            if next.is_none() {
                return current;
            }
            current = next;
        }
    }

    /// Child ending at or spanning the offset: `start < offset <= end`.
    /// At most one child qualifies because sibling spans do not overlap.
    fn pick_child_left(&self, id: NodeId, offset: u32) -> NodeId {
        for child in self.children(id) {
            let span = self.span(child);
            if span.start < offset && offset <= span.end {
                return child;
            }
        }
        NodeId::NONE
    }

    /// Child touching the offset, preferring strict containment and then
    /// the child that ends exactly at the offset (leaning left).
    fn pick_child_enclosing(&self, id: NodeId, offset: u32) -> NodeId {
        let mut left_touch = NodeId::NONE;
        let mut right_touch = NodeId::NONE;
        for child in self.children(id) {
            let span = self.span(child);
            if span.contains_inner(offset) {
                return child;
            }
            if span.touches(offset) {
                if span.end == offset {
                    left_touch = child;
                } else {
                    right_touch = child;
                }
            }
        }
        if !left_touch.is_none() {
            left_touch
        } else {
            right_touch
        }
    }

    fn link(&self, id: NodeId) -> Option<&NodeLinks> {
        self.links.get(id.0 as usize)
    }
}

/// Iterator over a node's direct children.
pub struct Children<'a> {
    tree: &'a SyntaxTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Bottom-up tree construction: children are created before their parent,
/// and attaching a child to a parent fixes its parent link. This is the
/// surface the external parser drives.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    links: Vec<NodeLinks>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    /// Add a leaf token node.
    pub fn token(&mut self, kind: SyntaxKind, start: u32, end: u32) -> NodeId {
        self.push(kind, Span::new(start, end))
    }

    /// Add an interior node spanning its children. `children` must be in
    /// source order and non-empty.
    pub fn node(&mut self, kind: SyntaxKind, children: &[NodeId]) -> NodeId {
        debug_assert!(!children.is_empty(), "interior node needs children");
        let start = children
            .first()
            .map(|&c| self.nodes[c.0 as usize].span.start)
            .unwrap_or(0);
        let end = children
            .last()
            .map(|&c| self.nodes[c.0 as usize].span.end)
            .unwrap_or(start);
        self.node_spanned(kind, Span::new(start, end), children)
    }

    /// Add an interior node with an explicit span, for when the node covers
    /// more text than its children (error recovery on unclosed constructs).
    pub fn node_spanned(&mut self, kind: SyntaxKind, span: Span, children: &[NodeId]) -> NodeId {
        let id = self.push(kind, span);
        let mut prev = NodeId::NONE;
        for &child in children {
            debug_assert!((child.0 as usize) < self.links.len(), "child out of range");
            let child_links = &mut self.links[child.0 as usize];
            debug_assert!(child_links.parent.is_none(), "child already attached");
            child_links.parent = id;
            if prev.is_none() {
                self.links[id.0 as usize].first_child = child;
            } else {
                self.links[prev.0 as usize].next_sibling = child;
            }
            prev = child;
        }
        self.links[id.0 as usize].last_child = prev;
        id
    }

    /// Finish construction, yielding the tree rooted at `root`.
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        debug_assert!((root.0 as usize) < self.nodes.len(), "root out of range");
        SyntaxTree {
            nodes: self.nodes,
            links: self.links,
            root,
        }
    }

    fn push(&mut self, kind: SyntaxKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        self.links.push(NodeLinks::default());
        id
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;

    /// Build the tree for `osc(30)` by hand:
    /// Script > ExpressionStatement > CallExpression(VariableName, ArgList).
    fn call_tree() -> SyntaxTree {
        let mut b = TreeBuilder::new();
        let name = b.token(SyntaxKind::VariableName, 0, 3);
        let open = b.token(SyntaxKind::OpenParen, 3, 4);
        let num = b.token(SyntaxKind::Number, 4, 6);
        let close = b.token(SyntaxKind::CloseParen, 6, 7);
        let args = b.node(SyntaxKind::ArgList, &[open, num, close]);
        let call = b.node(SyntaxKind::CallExpression, &[name, args]);
        let stmt = b.node(SyntaxKind::ExpressionStatement, &[call]);
        let root = b.node(SyntaxKind::Script, &[stmt]);
        b.finish(root)
    }

    #[test]
    fn test_navigation_links() {
        let tree = call_tree();
        let root = tree.root();
        assert_eq!(tree.kind(root), Some(SyntaxKind::Script));

        let stmt = tree.first_child(root);
        let call = tree.first_child(stmt);
        assert_eq!(tree.kind(call), Some(SyntaxKind::CallExpression));

        let name = tree.first_child(call);
        assert_eq!(tree.kind(name), Some(SyntaxKind::VariableName));
        let args = tree.next_sibling(name);
        assert_eq!(tree.kind(args), Some(SyntaxKind::ArgList));
        assert_eq!(tree.last_child(call), args);
        assert_eq!(tree.parent(args), call);

        let kinds: Vec<_> = tree
            .children(args)
            .map(|c| tree.kind(c).unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::OpenParen,
                SyntaxKind::Number,
                SyntaxKind::CloseParen
            ]
        );
    }

    #[test]
    fn test_resolve_left_prefers_ending_token() {
        let tree = call_tree();
        // Between `(` and `30`: the left bias picks the paren.
        let at_open = tree.resolve_at(4, Bias::Left);
        assert_eq!(tree.kind(at_open), Some(SyntaxKind::OpenParen));
        // Inside the number.
        let in_num = tree.resolve_at(5, Bias::Left);
        assert_eq!(tree.kind(in_num), Some(SyntaxKind::Number));
        // Offset 0 has nothing to the left; falls back to the root.
        assert_eq!(tree.resolve_at(0, Bias::Left), tree.root());
    }

    #[test]
    fn test_resolve_enclosing_leans_left_on_boundary() {
        let tree = call_tree();
        let at_boundary = tree.resolve_at(4, Bias::Enclosing);
        assert_eq!(tree.kind(at_boundary), Some(SyntaxKind::OpenParen));
    }

    #[test]
    fn test_resolve_end_of_text() {
        let tree = call_tree();
        let at_end = tree.resolve_at(7, Bias::Left);
        assert_eq!(tree.kind(at_end), Some(SyntaxKind::CloseParen));
    }

    #[test]
    fn test_text_slicing() {
        let tree = call_tree();
        let source = "osc(30)";
        let stmt = tree.first_child(tree.root());
        let call = tree.first_child(stmt);
        assert_eq!(tree.text(call, source), "osc(30)");
        assert_eq!(tree.text(tree.first_child(call), source), "osc");
        assert_eq!(tree.text(NodeId::NONE, source), "");
    }
}
