//! Context-aware completion for the vsl live-coding editor.
//!
//! Two cooperating pieces, run on every completion request:
//! - [`ContextAnalyzer`] works out what the cursor is syntactically doing
//!   in a possibly mid-keystroke, broken tree.
//! - [`SuggestionBuilder`] turns that context plus the metadata catalog
//!   into an ordered candidate list with a replacement span.
//!
//! Both are pure over one immutable tree/text snapshot. Neither ever
//! fails: an unresolvable context degrades to statement-start suggestions,
//! and the worst user-visible outcome is an empty list.

pub mod context;
pub use context::{ContextAnalyzer, CursorContext, Token};

pub mod suggest;
pub use suggest::{
    CompletionCandidate, CompletionKind, CompletionResponse, SuggestionBuilder, DOT_REVALIDATION,
    IDENT_REVALIDATION,
};

use vsl_catalog::Catalog;
use vsl_common::LineMap;
use vsl_syntax::SyntaxTree;

/// Analyze and suggest in one step. This is the entry point the editor's
/// completion trigger calls.
pub fn complete(
    tree: &SyntaxTree,
    line_map: &LineMap,
    source_text: &str,
    offset: u32,
    catalog: &Catalog,
) -> CompletionResponse {
    let context = ContextAnalyzer::new(tree, line_map, source_text).analyze(offset);
    SuggestionBuilder::new(catalog).build(&context)
}
