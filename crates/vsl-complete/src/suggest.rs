//! Suggestion building.
//!
//! Turns a [`CursorContext`] plus the metadata catalog into an ordered
//! candidate list. Pure function of its inputs: no tree, catalog or text is
//! mutated, and the same context always produces the same response.

use std::cmp::Ordering;

use tracing::debug;
use vsl_catalog::{Catalog, Category, FunctionSignature, ParamType};

use crate::context::CursorContext;

/// Revalidation pattern for plain identifier typing: the editor can keep
/// the current candidate list while the trailing text still matches.
pub const IDENT_REVALIDATION: &str = r"^[\w$]*$";
/// Stricter, dot-anchored revalidation used after a member-access dot.
pub const DOT_REVALIDATION: &str = r"^\.[\w$]*$";

/// Canonical numeric anchors offered for every numeric parameter, beside
/// the parameter's own default.
const NUMERIC_ANCHORS: &[(f64, &str)] = &[
    (0.0, "0"),
    (0.1, "0.1"),
    (0.5, "0.5"),
    (1.0, "1"),
    (2.0, "2"),
    (10.0, "10"),
];

/// What a candidate is, for icon and styling decisions in the editor.
/// Mirrors the catalog categories, plus `Value` for literal parameter
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompletionKind {
    #[serde(rename = "src")]
    Source,
    #[serde(rename = "coord")]
    Coord,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "combine")]
    Combine,
    #[serde(rename = "combineCoord")]
    CombineCoord,
    #[serde(rename = "external")]
    External,
    #[serde(rename = "output")]
    Output,
    #[serde(rename = "source")]
    Input,
    #[serde(rename = "number")]
    Scalar,
    #[serde(rename = "value")]
    Value,
}

impl From<Category> for CompletionKind {
    fn from(category: Category) -> Self {
        match category {
            Category::Source => CompletionKind::Source,
            Category::Coord => CompletionKind::Coord,
            Category::Color => CompletionKind::Color,
            Category::Combine => CompletionKind::Combine,
            Category::CombineCoord => CompletionKind::CombineCoord,
            Category::External => CompletionKind::External,
            Category::Output => CompletionKind::Output,
            Category::Input => CompletionKind::Input,
            Category::Scalar => CompletionKind::Scalar,
        }
    }
}

/// One completion candidate. `insert_text` concatenates cleanly with the
/// pre-cursor text once the replacement span is applied: chain candidates
/// carry their leading dot, and any dot the user already typed sits inside
/// the replaced token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CompletionKind,
    pub insert_text: String,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionKind, insert_text: impl Into<String>) -> Self {
        CompletionCandidate {
            label: label.into(),
            kind,
            insert_text: insert_text.into(),
        }
    }
}

/// The full response handed back to the editor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompletionResponse {
    /// Start of the span the selected candidate replaces.
    pub replace_from: u32,
    /// End of the span (the cursor).
    pub replace_to: u32,
    pub candidates: Vec<CompletionCandidate>,
    /// Pattern telling the editor which trailing text keeps this candidate
    /// list valid without a re-query.
    pub revalidation_pattern: &'static str,
}

/// Suggestion builder over an immutable catalog.
pub struct SuggestionBuilder<'a> {
    catalog: &'a Catalog,
}

impl<'a> SuggestionBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Build the candidate list for a cursor context. First matching rule
    /// wins: parameter position, then chain position, then statement start.
    pub fn build(&self, ctx: &CursorContext) -> CompletionResponse {
        let mut candidates = Vec::new();

        if ctx.suppressed {
            debug!("suppressed context, empty response");
        } else if ctx.in_parameters {
            self.param_candidates(ctx, &mut candidates);
        } else if ctx.after_dot || ctx.in_chain {
            self.chain_candidates(&mut candidates);
        } else {
            self.statement_candidates(ctx, &mut candidates);
        }

        if !ctx.token.text.is_empty() {
            let prefix = ctx.token.text.as_str();
            candidates.retain(|c| c.insert_text.starts_with(prefix) || c.label.starts_with(prefix));
        }
        debug!(count = candidates.len(), "built candidates");

        CompletionResponse {
            replace_from: ctx.token.from,
            replace_to: ctx.token.to,
            candidates,
            revalidation_pattern: if ctx.after_dot {
                DOT_REVALIDATION
            } else {
                IDENT_REVALIDATION
            },
        }
    }

    /// Inside an argument list: suggestions depend on which parameter of
    /// which function the cursor is at. An unknown function or an index
    /// past the parameter list yields nothing; both are normal states, not
    /// errors.
    fn param_candidates(&self, ctx: &CursorContext, out: &mut Vec<CompletionCandidate>) {
        let Some(name) = ctx.enclosing_function.as_deref() else {
            debug!("argument list with unresolvable callee");
            return;
        };
        let Some(sig) = self.catalog.get(name) else {
            debug!(name, "enclosing function not in catalog");
            return;
        };
        let Some(param) = sig.param(ctx.parameter_index as usize) else {
            debug!(
                name,
                index = ctx.parameter_index,
                "parameter index out of bounds"
            );
            return;
        };

        if sig.is_output_sink() {
            // `out(...)` and `render(...)` only ever take output buffers.
            for global in self.catalog.of_category(Category::Output) {
                if global.is_global() {
                    out.push(self.global_candidate(global));
                }
            }
            return;
        }

        match &param.ty {
            ParamType::Texture => {
                // Buffers first, then every source generator as a callable.
                for global in self.catalog.globals() {
                    if matches!(global.category, Category::Output | Category::Input) {
                        out.push(self.global_candidate(global));
                    }
                }
                for source in self.catalog.of_category(Category::Source) {
                    out.push(self.call_candidate(source));
                }
            }
            ParamType::Float => self.numeric_candidates(param.default.as_deref(), out),
            ParamType::Str | ParamType::Other(_) => {
                if let Some(default) = &param.default {
                    out.push(CompletionCandidate::new(
                        default.clone(),
                        CompletionKind::Value,
                        default.clone(),
                    ));
                }
            }
        }
    }

    /// The default value plus the canonical anchors, deduplicated against
    /// the default and sorted ascending.
    fn numeric_candidates(&self, default: Option<&str>, out: &mut Vec<CompletionCandidate>) {
        let mut values: Vec<(f64, String)> = Vec::new();
        if let Some(default) = default {
            match default.parse::<f64>() {
                Ok(value) => values.push((value, default.to_string())),
                // A default the table renders non-numerically still leads.
                Err(_) => out.push(CompletionCandidate::new(
                    default,
                    CompletionKind::Value,
                    default,
                )),
            }
        }
        for &(value, text) in NUMERIC_ANCHORS {
            if !values.iter().any(|&(v, _)| v == value) {
                values.push((value, text.to_string()));
            }
        }
        values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        for (_, text) in values {
            out.push(CompletionCandidate::new(
                text.clone(),
                CompletionKind::Value,
                text,
            ));
        }
    }

    /// After a dot, or anywhere inside a chain with no open argument list:
    /// every transform and combinator, rendered as a dot-prefixed call,
    /// plus the terminal `.out()`.
    fn chain_candidates(&self, out: &mut Vec<CompletionCandidate>) {
        for sig in self.catalog.chainable() {
            out.push(CompletionCandidate::new(
                format!(".{}()", sig.name),
                CompletionKind::from(sig.category),
                format!(".{}", sig.name),
            ));
        }
        // `out` ends the chain, so it completes with its parens in place.
        out.push(CompletionCandidate::new(
            ".out()",
            CompletionKind::Output,
            ".out()",
        ));
    }

    /// Statement start: source generators and external inputs, plus the
    /// globals unless the chain that just ended was routed into an output
    /// sink.
    fn statement_candidates(&self, ctx: &CursorContext, out: &mut Vec<CompletionCandidate>) {
        for sig in self.catalog.chain_starters() {
            out.push(self.call_candidate(sig));
        }
        let after_sink = ctx
            .last_call_name
            .as_deref()
            .and_then(|name| self.catalog.get(name))
            .is_some_and(FunctionSignature::is_output_sink);
        if after_sink {
            debug!("statement follows an output sink, omitting globals");
            return;
        }
        for global in self.catalog.globals() {
            out.push(self.global_candidate(global));
        }
    }

    fn call_candidate(&self, sig: &FunctionSignature) -> CompletionCandidate {
        CompletionCandidate::new(
            format!("{}()", sig.name),
            CompletionKind::from(sig.category),
            sig.name.clone(),
        )
    }

    fn global_candidate(&self, sig: &FunctionSignature) -> CompletionCandidate {
        CompletionCandidate::new(
            sig.name.clone(),
            CompletionKind::from(sig.category),
            sig.name.clone(),
        )
    }
}

#[cfg(test)]
#[path = "tests/suggest_tests.rs"]
mod suggest_tests;
