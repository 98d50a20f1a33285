#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::test_grammar::{
    lex, parse_render, parser, render, Arith, Num, Tail, Wrap, COMMA, EXPR, NODE, PLUS,
};
use crate::{BuildError, Grammar};
use ctk_ast::Pipeline;
use ctk_ir::{Position, SourceId};
use pretty_assertions::assert_eq;

fn col(start: u32, end: u32) -> Span {
    Span::new(Position::new(1, start), Position::new(1, end), SourceId::new(0))
}

#[test]
fn test_sum_reduces_to_one_token() {
    let output = parser().parse(lex("8 + 12")).unwrap();
    assert!(output.is_complete());
    assert_eq!(output.tokens.len(), 1);
    assert_eq!(output.tokens[0].kind(), EXPR);
    assert_eq!(output.tokens[0].span(), col(0, 6));

    let (ast, root) = output.into_root().unwrap();
    assert_eq!(render(&ast, root), "(8 + 12)");
    assert_eq!(ast.len(), 3);
    for child in ast.child_ids(root) {
        assert_eq!(ast.parent(child), Some(root));
    }
}

#[test]
fn test_same_precedence_is_right_associative() {
    assert_eq!(parse_render("1 + 2 + 3"), "(1 + (2 + 3))");
}

#[test]
fn test_tighter_bound_is_left_associative() {
    assert_eq!(parse_render("5 - 2 - 1"), "((5 - 2) - 1)");
    assert_eq!(parse_render("1 - 2 + 3"), "((1 - 2) + 3)");
}

#[test]
fn test_higher_precedence_binds_first() {
    assert_eq!(parse_render("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(parse_render("2 * 3 + 1"), "((2 * 3) + 1)");
    assert_eq!(parse_render("1 * 2 - 3 + 4"), "(((1 * 2) - 3) + 4)");
}

#[test]
fn test_value_matcher_rule() {
    assert_eq!(parse_render("unit + 2"), "(unit + 2)");
}

#[test]
fn test_precedence_guard_rejects_looser_rules() {
    let parser = parser();
    let mut tokens = lex("1 + 2");
    let mut ast = Ast::new();

    parser.reduce(&mut tokens, &mut ast, 0, 2).unwrap();

    // The literal reduces, the sum (precedence 1) does not.
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind(), EXPR);
    assert_eq!(tokens[1].kind(), PLUS);
    assert_eq!(ast.len(), 1);
}

#[test]
fn test_reduce_leaves_tokens_before_offset() {
    let parser = parser();
    let mut tokens = lex("1 , 2 + 3");
    let mut ast = Ast::new();

    parser.reduce(&mut tokens, &mut ast, 2, 0).unwrap();

    assert_eq!(tokens.len(), 3);
    assert!(tokens[0].leaf_value().is_some());
    assert_eq!(render(&ast, tokens[2].node_id().unwrap()), "(2 + 3)");
}

#[test]
fn test_leftover_comma() {
    let output = parser().parse(lex("8 ,")).unwrap();
    assert!(!output.is_complete());
    assert_eq!(output.tokens.len(), 2);
    assert_eq!(output.tokens[1].kind(), COMMA);
    assert_eq!(output.roots().len(), 1);

    let leftovers = output.leftovers().unwrap();
    assert_eq!(leftovers.spans, vec![col(2, 3)]);
    assert_eq!(output.into_root().unwrap_err(), leftovers);
}

#[test]
fn test_leftover_between_expressions() {
    let output = parser().parse(lex("1 , 2")).unwrap();
    assert_eq!(output.roots().len(), 2);
    assert_eq!(output.leftovers().unwrap().spans, vec![col(2, 3), col(4, 5)]);
}

#[test]
fn test_dangling_operator_is_left() {
    let output = parser().parse(lex("1 +")).unwrap();
    assert_eq!(output.leftovers().unwrap().spans, vec![col(2, 3)]);
}

#[test]
fn test_empty_input() {
    let output = parser().parse(Vec::new()).unwrap();
    assert!(output.ast.is_empty());
    assert_eq!(
        output.into_root().unwrap_err(),
        LeftoverTokens { spans: Vec::new() }
    );
}

#[test]
fn test_reducing_a_reduced_token_is_a_no_op() {
    let parser = parser();
    let ParseOutput { mut ast, mut tokens } = parser.parse(lex("8 + 12")).unwrap();
    let before = tokens.clone();
    let nodes = ast.len();

    parser.reduce(&mut tokens, &mut ast, 0, 0).unwrap();

    assert_eq!(tokens, before);
    assert_eq!(ast.len(), nodes);
}

#[test]
fn test_parse_is_deterministic() {
    let src = "1 * 2 - 3 + 4 * 5 - 6";
    let first = parser().parse(lex(src)).unwrap();
    let second = parser().parse(lex(src)).unwrap();
    assert_eq!(first.tokens, second.tokens);

    let (a, ra) = first.into_root().unwrap();
    let (b, rb) = second.into_root().unwrap();
    assert_eq!(render(&a, ra), render(&b, rb));
}

#[test]
fn test_match_into_padding_is_rejected() {
    let mut grammar = Grammar::<Arith>::new();
    grammar.add_rule::<Tail>().unwrap().add_rule::<Num>().unwrap();
    let output = Parser::new(grammar).parse(lex("5")).unwrap();

    let (ast, root) = output.into_root().unwrap();
    assert_eq!(ast.get::<Num>(root), Some(&Num(5)));
    assert!(ast.get::<Tail>(root).is_none());
}

#[test]
fn test_nesting_limit() {
    let parser = parser().with_config(ParserConfig::new().with_max_depth(2));
    assert_eq!(parser.config().max_depth, 2);

    assert!(parser.parse(lex("1 + 2 + 3")).unwrap().is_complete());

    let err = parser.parse(lex("1 + 2 + 3 + 4")).unwrap_err();
    assert_eq!(
        err,
        ReduceError::NestingTooDeep {
            depth: 2,
            span: col(12, 13),
        }
    );
}

#[test]
fn test_default_nesting_limit_allows_long_chains() {
    // Right-associative: one sub-parse per `+`.
    let src = vec!["1"; 3_000].join(" + ");
    let output = parser().parse(lex(&src)).unwrap();
    assert!(output.is_complete());
    assert_eq!(output.ast.len(), 2 * 3_000 - 1);
    assert_eq!(ParserConfig::default().max_depth, ParserConfig::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_tokens_from_another_tree_are_rejected() {
    let mut tokens = parser().parse(lex("1 + 2 + 3")).unwrap().tokens;
    tokens.extend(lex("+ 4"));

    let err = parser()
        .reduce(&mut tokens, &mut Ast::new(), 0, 0)
        .unwrap_err();
    assert_eq!(
        err,
        ReduceError::ForeignNode {
            rule: "Add",
            span: col(0, 9),
        }
    );
}

#[test]
fn test_consumed_node_cannot_be_reduced_again() {
    let output = parser().parse(lex("1 + 2")).unwrap();
    let mut ast = output.ast;
    let root = output.tokens[0].node_id().unwrap();
    let lhs = ast.children(root)[0].clone();

    let mut tokens = vec![lhs];
    tokens.extend(lex("+ 3"));
    let err = parser().reduce(&mut tokens, &mut ast, 0, 0).unwrap_err();
    assert!(matches!(err, ReduceError::ForeignNode { rule: "Add", .. }));
    assert_eq!(err.to_diagnostic().code, ctk_diagnostic::ErrorCode::E1005);
}

#[test]
fn test_cyclic_unit_rules_are_detected() {
    let mut grammar = Grammar::<Arith>::new();
    grammar.add_rule::<Num>().unwrap().add_rule::<Wrap>().unwrap();

    let err = Parser::new(grammar).parse(lex("1")).unwrap_err();
    assert!(matches!(err, ReduceError::CyclicUnitRules { rule: "Wrap", .. }));
    assert_eq!(err.span(), col(0, 1));
}

#[test]
fn test_build_error_stops_the_pass() {
    let err = parser().parse(lex("1 + 99999999999999999999")).unwrap_err();
    match err {
        ReduceError::Build { rule, span, source } => {
            assert_eq!(rule, "Num");
            assert_eq!(span, col(4, 24));
            assert!(matches!(source, BuildError::Invalid { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_reduced_tree_runs_steps() {
    let (ast, root) = parser()
        .parse(lex("1 * 2 - 3 + 4"))
        .unwrap()
        .into_root()
        .unwrap();
    let results = Pipeline::for_type(&NODE)
        .unwrap()
        .run(&ast, &[root], &mut ())
        .unwrap();
    assert_eq!(results[0].outputs, vec![3]);
}
