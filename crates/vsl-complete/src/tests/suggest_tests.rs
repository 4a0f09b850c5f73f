use super::*;
use crate::context::{CursorContext, Token};

fn statement_ctx() -> CursorContext {
    CursorContext {
        in_parameters: false,
        enclosing_function: None,
        parameter_index: 0,
        after_dot: false,
        in_chain: false,
        last_call_name: None,
        token: Token {
            text: String::new(),
            from: 0,
            to: 0,
        },
        suppressed: false,
    }
}

fn param_ctx(function: &str, index: u32) -> CursorContext {
    CursorContext {
        in_parameters: true,
        enclosing_function: Some(function.to_string()),
        parameter_index: index,
        ..statement_ctx()
    }
}

fn labels(response: &CompletionResponse) -> Vec<&str> {
    response.candidates.iter().map(|c| c.label.as_str()).collect()
}

#[test]
fn test_numeric_parameter_default_plus_anchors() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("osc", 0));
    // osc frequency defaults to 60; anchors sort in front of it.
    assert_eq!(labels(&response), vec!["0", "0.1", "0.5", "1", "2", "10", "60"]);
    assert!(response
        .candidates
        .iter()
        .all(|c| c.kind == CompletionKind::Value));
}

#[test]
fn test_numeric_default_deduplicates_against_anchors() {
    let catalog = Catalog::builtin();
    // rotate's second parameter (speed) defaults to 0, which is an anchor.
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("rotate", 1));
    assert_eq!(labels(&response), vec!["0", "0.1", "0.5", "1", "2", "10"]);
}

#[test]
fn test_texture_parameter_suggests_buffers_then_sources() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("modulate", 0));
    let labels = labels(&response);
    assert_eq!(
        &labels[..8],
        &["o0", "o1", "o2", "o3", "s0", "s1", "s2", "s3"]
    );
    assert!(labels.contains(&"osc()"));
    assert!(labels.contains(&"noise()"));
    assert!(!labels.contains(&"rotate()"), "transforms are not textures");
    let osc = response
        .candidates
        .iter()
        .find(|c| c.label == "osc()")
        .unwrap();
    assert_eq!(osc.insert_text, "osc");
}

#[test]
fn test_output_sink_takes_only_output_buffers() {
    let catalog = Catalog::builtin();
    for sink in ["out", "render"] {
        let response = SuggestionBuilder::new(&catalog).build(&param_ctx(sink, 0));
        assert_eq!(labels(&response), vec!["o0", "o1", "o2", "o3"], "{}", sink);
    }
}

#[test]
fn test_string_parameter_has_no_default_to_offer() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("initImage", 0));
    assert!(response.candidates.is_empty());
}

#[test]
fn test_parameter_index_out_of_bounds_is_empty() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("kaleid", 1));
    assert!(response.candidates.is_empty());
}

#[test]
fn test_unknown_function_is_empty() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&param_ctx("wibble", 0));
    assert!(response.candidates.is_empty());
}

#[test]
fn test_unresolved_callee_is_empty() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.in_parameters = true;
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    assert!(response.candidates.is_empty());
}

#[test]
fn test_chain_suggestions_after_dot() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.after_dot = true;
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    let labels = labels(&response);

    assert!(labels.contains(&".rotate()"));
    assert!(labels.contains(&".color()"));
    assert!(labels.contains(&".modulate()"));
    assert!(labels.contains(&".out()"));
    assert!(!labels.contains(&"osc()"), "sources never chain");
    assert!(!labels.contains(&"o0"), "globals never chain");
    assert_eq!(response.revalidation_pattern, DOT_REVALIDATION);

    let rotate = response
        .candidates
        .iter()
        .find(|c| c.label == ".rotate()")
        .unwrap();
    assert_eq!(rotate.insert_text, ".rotate");
    let out = response
        .candidates
        .iter()
        .find(|c| c.label == ".out()")
        .unwrap();
    assert_eq!(out.insert_text, ".out()", "out completes with its parens");
}

#[test]
fn test_chain_context_without_dot_gets_same_list() {
    let catalog = Catalog::builtin();
    let mut with_dot = statement_ctx();
    with_dot.after_dot = true;
    let mut in_chain = statement_ctx();
    in_chain.in_chain = true;

    let builder = SuggestionBuilder::new(&catalog);
    let a = builder.build(&with_dot);
    let b = builder.build(&in_chain);
    assert_eq!(a.candidates, b.candidates);
    assert_eq!(b.revalidation_pattern, IDENT_REVALIDATION);
}

#[test]
fn test_statement_start_suggests_sources_and_globals() {
    let catalog = Catalog::builtin();
    let response = SuggestionBuilder::new(&catalog).build(&statement_ctx());
    let labels = labels(&response);

    assert!(labels.contains(&"osc()"));
    assert!(labels.contains(&"initCam()"));
    assert!(labels.contains(&"time"));
    assert!(labels.contains(&"o0"));
    assert!(labels.contains(&"s0"));
    assert!(!labels.contains(&".rotate()"));
    assert!(!labels.contains(&"rotate()"), "transforms only chain");
    assert_eq!(response.revalidation_pattern, IDENT_REVALIDATION);
}

#[test]
fn test_globals_suppressed_after_output_sink() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.last_call_name = Some("out".to_string());
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    let labels = labels(&response);

    assert!(labels.contains(&"osc()"));
    assert!(!labels.contains(&"time"));
    assert!(!labels.contains(&"o0"));
}

#[test]
fn test_globals_kept_after_ordinary_call() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.last_call_name = Some("osc".to_string());
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    assert!(labels(&response).contains(&"time"));
}

#[test]
fn test_token_prefix_filters_candidates() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.token = Token {
        text: "os".to_string(),
        from: 0,
        to: 2,
    };
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    assert_eq!(labels(&response), vec!["osc()"]);
    assert_eq!(response.replace_from, 0);
    assert_eq!(response.replace_to, 2);
}

#[test]
fn test_dot_prefix_filters_chain_candidates() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.after_dot = true;
    ctx.token = Token {
        text: ".ro".to_string(),
        from: 8,
        to: 11,
    };
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    assert_eq!(labels(&response), vec![".rotate()"]);
    assert_eq!(response.replace_from, 8);
}

#[test]
fn test_suppressed_context_is_empty() {
    let catalog = Catalog::builtin();
    let mut ctx = statement_ctx();
    ctx.suppressed = true;
    let response = SuggestionBuilder::new(&catalog).build(&ctx);
    assert!(response.candidates.is_empty());
}
