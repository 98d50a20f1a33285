use super::*;
use pretty_assertions::assert_eq;

const ANALYZE: StepDecl = StepDecl::new("analyze", 0);
const EMIT: StepDecl = StepDecl::new("emit", 1);
const LOWER: StepDecl = StepDecl::new("lower", 5);
const CHECK: StepDecl = StepDecl::new("check", 0);

// Declared emit-before-analyze on purpose: execution follows the order index.
static BASE: NodeType = NodeType::root("Base", &[EMIT, ANALYZE]);
static EXPR: NodeType = NodeType::abstract_child("Expr", &BASE, &[]);
static LOWERED: NodeType = NodeType::abstract_child("Lowered", &EXPR, &[LOWER, CHECK]);
static LITERAL: NodeType = NodeType::concrete("Literal", &EXPR);
static CALL: NodeType = NodeType::concrete("Call", &LOWERED);
static SHADOW: NodeType = NodeType::concrete("Shadow", &EXPR).with_steps(&[EMIT]);
static OTHER_ROOT: NodeType = NodeType::root("Other", &[]);

fn names(steps: &[StepDecl]) -> Vec<&'static str> {
    steps.iter().map(StepDecl::name).collect()
}

#[test]
fn test_ancestry_nearest_first() {
    let chain: Vec<&str> = CALL.ancestry().map(NodeType::name).collect();
    assert_eq!(chain, vec!["Call", "Lowered", "Expr", "Base"]);
}

#[test]
fn test_is_a_follows_parents() {
    assert!(LITERAL.is_a(&LITERAL));
    assert!(LITERAL.is_a(&EXPR));
    assert!(LITERAL.is_a(&BASE));
    assert!(!LITERAL.is_a(&CALL));
    assert!(!EXPR.is_a(&LITERAL));
    assert!(!LITERAL.is_a(&OTHER_ROOT));
}

#[test]
fn test_identity_equality() {
    assert_eq!(&LITERAL, &LITERAL);
    assert_ne!(&LITERAL, &CALL);
}

#[test]
fn test_required_steps_follow_order_index() {
    let steps = LITERAL.required_steps().unwrap_or_default();
    assert_eq!(names(&steps), vec!["analyze", "emit"]);
}

#[test]
fn test_required_steps_union_along_ancestry() {
    // `check` ties with `analyze` at 0; the ancestor's step runs first.
    let steps = CALL.required_steps().unwrap_or_default();
    assert_eq!(names(&steps), vec!["analyze", "check", "emit", "lower"]);
}

#[test]
fn test_redeclared_step_is_rejected() {
    let err = SHADOW.required_steps();
    assert_eq!(
        err,
        Err(GrammarError::DuplicateStep {
            step: "emit",
            first: "Base",
            second: "Shadow",
        })
    );
}

#[test]
fn test_kinds() {
    assert!(BASE.is_abstract());
    assert!(EXPR.is_abstract());
    assert_eq!(LITERAL.kind(), NodeTypeKind::Concrete);
    assert_eq!(LITERAL.parent().map(NodeType::name), Some("Expr"));
    assert!(BASE.parent().is_none());
}
