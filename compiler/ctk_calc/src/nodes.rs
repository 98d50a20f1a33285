//! Node hierarchy and node types of the calculator.
//!
//! ```text
//! AstNode            analyze_types (0), compile (1)
//! └── ExpressionNode
//!     ├── NumberLiteral
//!     ├── BoolLiteral
//!     ├── Sum
//!     ├── Difference
//!     └── Product
//! ```

use ctk_ast::{NodeKind, NodeType, StepCx, StepDecl, StepError, StepTable};
use ctk_ir::NodeId;
use ctk_parse::{BuildError, Matched, Matcher, Pattern, Production};

use crate::lexer::{EXPRESSION, MINUS, NUMBER, PLUS, STAR};
use crate::{Calc, Type, Value};

/// Resolves the type of every expression into the [`TypeContext`](crate::TypeContext).
pub const ANALYZE_TYPES: StepDecl = StepDecl::new("analyze_types", 0);
/// Folds an expression to its value.
pub const COMPILE: StepDecl = StepDecl::new("compile", 1);

pub static AST_NODE: NodeType = NodeType::root("AstNode", &[ANALYZE_TYPES, COMPILE]);
pub static EXPRESSION_NODE: NodeType = NodeType::abstract_child("ExpressionNode", &AST_NODE, &[]);
pub static NUMBER_LITERAL: NodeType = NodeType::concrete("NumberLiteral", &EXPRESSION_NODE);
pub static BOOL_LITERAL: NodeType = NodeType::concrete("BoolLiteral", &EXPRESSION_NODE);
pub static SUM: NodeType = NodeType::concrete("Sum", &EXPRESSION_NODE);
pub static DIFFERENCE: NodeType = NodeType::concrete("Difference", &EXPRESSION_NODE);
pub static PRODUCT: NodeType = NodeType::concrete("Product", &EXPRESSION_NODE);

type StepResult = Result<Value, StepError>;

fn record(cx: &mut StepCx<'_, Calc>, ty: Type) -> StepResult {
    let id = cx.id();
    cx.context().record(id, ty);
    Ok(Value::Unit)
}

// Literals

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NumberLiteral {
    pub value: i64,
}

impl NumberLiteral {
    fn analyze_types(&self, cx: &mut StepCx<'_, Calc>) -> StepResult {
        record(cx, Type::Integer)
    }

    fn compile(&self, _: &mut StepCx<'_, Calc>) -> StepResult {
        Ok(Value::Int(self.value))
    }
}

impl NodeKind<Calc> for NumberLiteral {
    fn node_type() -> &'static NodeType {
        &NUMBER_LITERAL
    }

    fn steps() -> StepTable<Self, Calc> {
        StepTable::new()
            .step(ANALYZE_TYPES, Self::analyze_types)
            .step(COMPILE, Self::compile)
    }
}

impl Production<Calc> for NumberLiteral {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPRESSION).slot("value", Matcher::kind(NUMBER))
    }

    fn build(matched: &Matched<'_, Calc>) -> Result<Self, BuildError> {
        let text = matched.leaf("value")?;
        let value = text.parse().map_err(|_| {
            BuildError::invalid(
                format!("integer literal `{text}` does not fit in 64 bits"),
                matched.span(),
            )
        })?;
        Ok(NumberLiteral { value })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BoolLiteral {
    pub value: bool,
}

impl BoolLiteral {
    /// Matches the keyword `word`.
    fn pattern_for(word: &str) -> Pattern<String> {
        Pattern::new(EXPRESSION).slot("value", Matcher::value(word.to_owned()))
    }

    /// Alternative pattern for `false`.
    pub fn false_pattern() -> Pattern<String> {
        Self::pattern_for("false")
    }

    fn analyze_types(&self, cx: &mut StepCx<'_, Calc>) -> StepResult {
        record(cx, Type::Boolean)
    }

    fn compile(&self, _: &mut StepCx<'_, Calc>) -> StepResult {
        Ok(Value::Bool(self.value))
    }
}

impl NodeKind<Calc> for BoolLiteral {
    fn node_type() -> &'static NodeType {
        &BOOL_LITERAL
    }

    fn steps() -> StepTable<Self, Calc> {
        StepTable::new()
            .step(ANALYZE_TYPES, Self::analyze_types)
            .step(COMPILE, Self::compile)
    }
}

impl Production<Calc> for BoolLiteral {
    fn pattern() -> Pattern<String> {
        Self::pattern_for("true")
    }

    fn build(matched: &Matched<'_, Calc>) -> Result<Self, BuildError> {
        Ok(BoolLiteral {
            value: matched.leaf("value")? == "true",
        })
    }
}

// Binary operators

/// Integer operator over two expression operands.
pub trait BinaryOp: NodeKind<Calc> {
    const SYMBOL: &'static str;

    fn operands(&self) -> (NodeId, NodeId);

    /// `None` on overflow.
    fn apply(lhs: i64, rhs: i64) -> Option<i64>;
}

/// Steps shared by every binary operator.
fn binary_steps<T: BinaryOp>() -> StepTable<T, Calc> {
    StepTable::new()
        .step(ANALYZE_TYPES, analyze_binary::<T>)
        .step(COMPILE, compile_binary::<T>)
}

fn analyze_binary<T: BinaryOp>(node: &T, cx: &mut StepCx<'_, Calc>) -> StepResult {
    let (lhs, rhs) = node.operands();
    for operand in [lhs, rhs] {
        cx.run(operand)?;
        match cx.context().type_of(operand) {
            Some(Type::Integer) => {}
            found => {
                let found = found.map_or_else(|| "nothing".to_owned(), |ty| ty.to_string());
                return Err(StepError::new(
                    format!(
                        "type mismatch: `{}` expects integer operands, found {found}",
                        T::SYMBOL
                    ),
                    cx.ast().span(operand),
                )
                .with_span(cx.span()));
            }
        }
    }
    record(cx, Type::Integer)
}

fn compile_binary<T: BinaryOp>(node: &T, cx: &mut StepCx<'_, Calc>) -> StepResult {
    let (lhs, rhs) = node.operands();
    let lhs = integer(cx, lhs)?;
    let rhs = integer(cx, rhs)?;
    T::apply(lhs, rhs)
        .map(Value::Int)
        .ok_or_else(|| cx.error(format!("integer overflow in `{lhs} {} {rhs}`", T::SYMBOL)))
}

fn integer(cx: &mut StepCx<'_, Calc>, operand: NodeId) -> Result<i64, StepError> {
    match cx.run(operand)? {
        Value::Int(n) => Ok(n),
        other => Err(StepError::new(
            format!("expected an integer, found `{other}`"),
            cx.ast().span(operand),
        )),
    }
}

fn operands(matched: &Matched<'_, Calc>) -> Result<(NodeId, NodeId), BuildError> {
    Ok((matched.node("lhs")?, matched.node("rhs")?))
}

/// `lhs + rhs`, right-associative.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Sum {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

impl BinaryOp for Sum {
    const SYMBOL: &'static str = "+";

    fn operands(&self) -> (NodeId, NodeId) {
        (self.lhs, self.rhs)
    }

    fn apply(lhs: i64, rhs: i64) -> Option<i64> {
        lhs.checked_add(rhs)
    }
}

impl NodeKind<Calc> for Sum {
    fn node_type() -> &'static NodeType {
        &SUM
    }

    fn steps() -> StepTable<Self, Calc> {
        binary_steps()
    }
}

impl Production<Calc> for Sum {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPRESSION)
            .with_precedence(1)
            .slot("lhs", Matcher::kind(EXPRESSION))
            .slot("operator", Matcher::kind(PLUS))
            .slot("rhs", Matcher::parse_then(Matcher::kind(EXPRESSION)))
    }

    fn build(matched: &Matched<'_, Calc>) -> Result<Self, BuildError> {
        let (lhs, rhs) = operands(matched)?;
        Ok(Sum { lhs, rhs })
    }
}

/// `lhs - rhs`, left-associative.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Difference {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

impl BinaryOp for Difference {
    const SYMBOL: &'static str = "-";

    fn operands(&self) -> (NodeId, NodeId) {
        (self.lhs, self.rhs)
    }

    fn apply(lhs: i64, rhs: i64) -> Option<i64> {
        lhs.checked_sub(rhs)
    }
}

impl NodeKind<Calc> for Difference {
    fn node_type() -> &'static NodeType {
        &DIFFERENCE
    }

    fn steps() -> StepTable<Self, Calc> {
        binary_steps()
    }
}

impl Production<Calc> for Difference {
    fn pattern() -> Pattern<String> {
        // Bound 2 keeps the nested pass from folding another `-`.
        Pattern::new(EXPRESSION)
            .with_precedence(1)
            .slot("lhs", Matcher::kind(EXPRESSION))
            .slot("operator", Matcher::kind(MINUS))
            .slot("rhs", Matcher::parse_then_bound(2, Matcher::kind(EXPRESSION)))
    }

    fn build(matched: &Matched<'_, Calc>) -> Result<Self, BuildError> {
        let (lhs, rhs) = operands(matched)?;
        Ok(Difference { lhs, rhs })
    }
}

/// `lhs * rhs`, binds tighter than `+` and `-`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Product {
    pub lhs: NodeId,
    pub rhs: NodeId,
}

impl BinaryOp for Product {
    const SYMBOL: &'static str = "*";

    fn operands(&self) -> (NodeId, NodeId) {
        (self.lhs, self.rhs)
    }

    fn apply(lhs: i64, rhs: i64) -> Option<i64> {
        lhs.checked_mul(rhs)
    }
}

impl NodeKind<Calc> for Product {
    fn node_type() -> &'static NodeType {
        &PRODUCT
    }

    fn steps() -> StepTable<Self, Calc> {
        binary_steps()
    }
}

impl Production<Calc> for Product {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPRESSION)
            .with_precedence(2)
            .slot("lhs", Matcher::node(&EXPRESSION_NODE))
            .slot("operator", Matcher::kind(STAR))
            .slot("rhs", Matcher::parse_then(Matcher::kind(EXPRESSION)))
    }

    fn build(matched: &Matched<'_, Calc>) -> Result<Self, BuildError> {
        let (lhs, rhs) = operands(matched)?;
        Ok(Product { lhs, rhs })
    }
}
