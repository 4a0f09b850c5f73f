//! Common types and utilities for the vsl completion engine.
//!
//! This crate provides the foundational types shared by the syntax and
//! completion crates:
//! - Source spans (`Span`, byte offsets)
//! - Position/line-map types for source locations (`Position`, `LineMap`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};
