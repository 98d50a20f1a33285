//! A small calculator built on the ctk reducer and step pipeline.
//!
//! Integer literals, `true`/`false`, and the operators `+`, `-` and `*`.
//! `*` binds tighter than `+` and `-`; `+` is right-associative and `-` is
//! left-associative. Evaluation runs `analyze_types` over the tree, then
//! `compile`, which folds it to a [`Value`].

mod lexer;
mod nodes;
mod types;

use std::sync::Once;

use ctk_ast::{GrammarError, Language, Pipeline, StepError};
use ctk_diagnostic::Diagnostic;
use ctk_ir::{Source, SourceId};
use ctk_parse::{Grammar, LeftoverTokens, Parser, ReduceError};

pub use lexer::{lex, LexError, COMMA, EXPRESSION, KEYWORD, MINUS, NUMBER, PLUS, STAR};
pub use nodes::{
    BinaryOp, BoolLiteral, Difference, NumberLiteral, Product, Sum, ANALYZE_TYPES, AST_NODE,
    BOOL_LITERAL, COMPILE, DIFFERENCE, EXPRESSION_NODE, NUMBER_LITERAL, PRODUCT, SUM,
};
pub use types::{Type, TypeContext, Value};

/// The calculator language.
#[derive(Copy, Clone, Debug)]
pub struct Calc;

impl Language for Calc {
    type Value = String;
    type Context = TypeContext;
    type Output = Value;
}

/// Rules in precedence-relevant order: literals first, then `*`, `+`, `-`.
pub fn grammar() -> Result<Grammar<Calc>, GrammarError> {
    let mut grammar = Grammar::new();
    grammar
        .add_rule::<NumberLiteral>()?
        .add_rule::<BoolLiteral>()?
        .add_rule_with::<BoolLiteral>(BoolLiteral::false_pattern())?
        .add_rule::<Product>()?
        .add_rule::<Sum>()?
        .add_rule::<Difference>()?;
    Ok(grammar)
}

pub fn parser() -> Result<Parser<Calc>, GrammarError> {
    Ok(Parser::new(grammar()?))
}

/// Anything that can go wrong between source text and a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Reduce(#[from] ReduceError),
    #[error(transparent)]
    Leftover(#[from] LeftoverTokens),
    #[error(transparent)]
    Step(#[from] StepError),
}

impl CalcError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CalcError::Lex(err) => err.to_diagnostic(),
            CalcError::Grammar(err) => err.to_diagnostic(),
            CalcError::Reduce(err) => err.to_diagnostic(),
            CalcError::Leftover(err) => err.to_diagnostic(),
            CalcError::Step(err) => err.to_diagnostic(),
        }
    }
}

/// Result of evaluating one expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub ty: Option<Type>,
    pub value: Value,
}

/// Lex, reduce, type-check and fold `text`.
#[tracing::instrument(level = "debug")]
pub fn evaluate(text: &str) -> Result<Evaluation, CalcError> {
    let source = Source::new(text).with_name("<input>");
    let tokens = lex(&source, SourceId::new(0))?;
    let (ast, root) = parser()?.parse(tokens)?.into_root()?;

    let mut ctx = TypeContext::new();
    let steps = Pipeline::for_type(&AST_NODE)?.run(&ast, &[root], &mut ctx)?;
    let value = steps
        .into_iter()
        .find(|s| s.step == COMPILE)
        .and_then(|s| s.outputs.into_iter().next())
        .unwrap_or(Value::Unit);

    Ok(Evaluation {
        ty: ctx.type_of(root),
        value,
    })
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
