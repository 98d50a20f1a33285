//! Property-based tests for reduction and evaluation.
//!
//! Random arithmetic over `+`, `-` and `*` must evaluate the same way as
//! conventional precedence with left-to-right folding, and reducing the same
//! input twice must produce the same tree.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use ctk_ast::Ast;
use ctk_calc::{evaluate, lex, parser, Calc, Value};
use ctk_ir::{NodeId, Source, SourceId};
use proptest::prelude::*;

#[derive(Copy, Clone, Debug)]
enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
        }
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Add), Just(Op::Sub), Just(Op::Mul)]
}

/// A first operand followed by up to seven `(operator, operand)` pairs.
fn expression_strategy() -> impl Strategy<Value = (i64, Vec<(Op, i64)>)> {
    (0i64..100, prop::collection::vec((op_strategy(), 0i64..100), 0..8))
}

fn render(first: i64, rest: &[(Op, i64)]) -> String {
    let mut text = first.to_string();
    for (op, n) in rest {
        text.push_str(&format!(" {} {n}", op.symbol()));
    }
    text
}

/// Products first, then sums and differences from the left.
fn reference(first: i64, rest: &[(Op, i64)]) -> i64 {
    let mut terms = vec![(Op::Add, first)];
    for &(op, n) in rest {
        match op {
            Op::Mul => {
                if let Some(last) = terms.last_mut() {
                    last.1 *= n;
                }
            }
            _ => terms.push((op, n)),
        }
    }
    terms.into_iter().fold(0, |acc, (op, n)| match op {
        Op::Sub => acc - n,
        _ => acc + n,
    })
}

/// Parenthesized rendering of a reduced tree.
fn shape(ast: &Ast<Calc>, id: NodeId) -> String {
    let node = ast.node(id);
    let children: Vec<_> = ast.child_ids(id).map(|c| shape(ast, c)).collect();
    if children.is_empty() {
        node.node_type().to_string()
    } else {
        format!("({} {})", node.node_type(), children.join(" "))
    }
}

fn reduce(text: &str) -> String {
    let tokens = lex(&Source::new(text), SourceId::new(0)).unwrap();
    let (ast, root) = parser().unwrap().parse(tokens).unwrap().into_root().unwrap();
    shape(&ast, root)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn evaluation_matches_reference((first, rest) in expression_strategy()) {
        let text = render(first, &rest);
        let evaluation = evaluate(&text).unwrap();
        prop_assert_eq!(evaluation.value, Value::Int(reference(first, &rest)), "{}", text);
    }

    #[test]
    fn reduction_is_deterministic((first, rest) in expression_strategy()) {
        let text = render(first, &rest);
        prop_assert_eq!(reduce(&text), reduce(&text));
    }

    #[test]
    fn every_operator_becomes_a_node((first, rest) in expression_strategy()) {
        let text = render(first, &rest);
        let tokens = lex(&Source::new(&text), SourceId::new(0)).unwrap();
        let output = parser().unwrap().parse(tokens).unwrap();
        prop_assert!(output.is_complete());
        prop_assert_eq!(output.ast.len(), 2 * rest.len() + 1);
    }

    #[test]
    fn trailing_operator_is_left_over((first, rest) in expression_strategy(), op in op_strategy()) {
        let text = format!("{} {}", render(first, &rest), op.symbol());
        let tokens = lex(&Source::new(&text), SourceId::new(0)).unwrap();
        let output = parser().unwrap().parse(tokens).unwrap();
        prop_assert!(!output.is_complete());
        prop_assert!(output.leftovers().is_some());
    }
}
