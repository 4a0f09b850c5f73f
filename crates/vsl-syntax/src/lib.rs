//! Syntax tree interface for the vsl completion engine.
//!
//! The incremental parser lives outside this workspace; what it produces is
//! a read-only tree of spanned, kind-tagged nodes. This crate defines that
//! interface:
//! - `SyntaxKind` - closed set of node kinds the completion engine reacts to
//! - `SyntaxTree` / `NodeId` - arena-indexed nodes with parent and sibling
//!   links, plus offset resolution (`resolve_at`)
//! - `TreeBuilder` - the construction surface the parser drives, bottom-up
//!
//! The `fixture` module (feature `fixture`, test builds only) contains a
//! small tolerant parser for the DSL subset so tests can build trees
//! straight from source text, including mid-keystroke broken input.

pub mod kind;
pub use kind::SyntaxKind;

pub mod tree;
pub use tree::{Bias, NodeId, SyntaxTree, TreeBuilder};

#[cfg(any(test, feature = "fixture"))]
pub mod fixture;
