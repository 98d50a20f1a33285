//! A small arithmetic grammar shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ctk_ast::{Ast, Language, NodeKind, NodeType, StepDecl, StepTable};
use ctk_ir::{NodeId, Position, SourceId, Span, Token, TokenKind};

use crate::{BuildError, Grammar, Matched, Matcher, Parser, Pattern, Production};

pub struct Arith;

impl Language for Arith {
    type Value = String;
    type Context = ();
    type Output = i64;
}

pub const NUM: TokenKind = TokenKind::new("Num");
pub const IDENT: TokenKind = TokenKind::new("Ident");
pub const PLUS: TokenKind = TokenKind::new("Plus");
pub const MINUS: TokenKind = TokenKind::new("Minus");
pub const STAR: TokenKind = TokenKind::new("Star");
pub const COMMA: TokenKind = TokenKind::new("Comma");
pub const EXPR: TokenKind = TokenKind::new("Expr");

pub const EVAL: StepDecl = StepDecl::new("eval", 0);

pub static NODE: NodeType = NodeType::root("Node", &[EVAL]);
pub static EXPR_NODE: NodeType = NodeType::abstract_child("ExprNode", &NODE, &[]);
pub static NUM_NODE: NodeType = NodeType::concrete("Num", &EXPR_NODE);
pub static UNIT_NODE: NodeType = NodeType::concrete("Unit", &EXPR_NODE);
pub static ADD_NODE: NodeType = NodeType::concrete("Add", &EXPR_NODE);
pub static SUB_NODE: NodeType = NodeType::concrete("Sub", &EXPR_NODE);
pub static MUL_NODE: NodeType = NodeType::concrete("Mul", &EXPR_NODE);
pub static WRAP_NODE: NodeType = NodeType::concrete("Wrap", &EXPR_NODE);
pub static TAIL_NODE: NodeType = NodeType::concrete("Tail", &EXPR_NODE);

#[derive(Debug, PartialEq)]
pub struct Num(pub i64);

impl NodeKind<Arith> for Num {
    fn node_type() -> &'static NodeType {
        &NUM_NODE
    }

    fn steps() -> StepTable<Self, Arith> {
        StepTable::new().step(EVAL, |num, _| Ok(num.0))
    }
}

impl Production<Arith> for Num {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPR).slot("value", Matcher::kind(NUM))
    }

    fn build(matched: &Matched<'_, Arith>) -> Result<Self, BuildError> {
        let text = matched.leaf("value")?;
        text.parse()
            .map(Num)
            .map_err(|_| BuildError::invalid(format!("`{text}` is out of range"), matched.span()))
    }
}

#[derive(Debug)]
pub struct Unit;

impl NodeKind<Arith> for Unit {
    fn node_type() -> &'static NodeType {
        &UNIT_NODE
    }

    fn steps() -> StepTable<Self, Arith> {
        StepTable::new().step(EVAL, |_, _| Ok(0))
    }
}

impl Production<Arith> for Unit {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPR).slot("unit", Matcher::value("unit".to_owned()))
    }

    fn build(_: &Matched<'_, Arith>) -> Result<Self, BuildError> {
        Ok(Unit)
    }
}

macro_rules! binary {
    ($name:ident, $ty:ident, $op:ident, $prec:literal, $rhs:expr, |$l:ident, $r:ident| $eval:expr) => {
        #[derive(Debug)]
        pub struct $name {
            pub lhs: NodeId,
            pub rhs: NodeId,
        }

        impl NodeKind<Arith> for $name {
            fn node_type() -> &'static NodeType {
                &$ty
            }

            fn steps() -> StepTable<Self, Arith> {
                StepTable::new().step(EVAL, |node, cx| {
                    let $l = cx.run(node.lhs)?;
                    let $r = cx.run(node.rhs)?;
                    Ok($eval)
                })
            }
        }

        impl Production<Arith> for $name {
            fn pattern() -> Pattern<String> {
                Pattern::new(EXPR)
                    .with_precedence($prec)
                    .slot("lhs", Matcher::node(&EXPR_NODE))
                    .slot("op", Matcher::kind($op))
                    .slot("rhs", $rhs)
            }

            fn build(matched: &Matched<'_, Arith>) -> Result<Self, BuildError> {
                Ok($name {
                    lhs: matched.node("lhs")?,
                    rhs: matched.node("rhs")?,
                })
            }
        }
    };
}

binary!(Add, ADD_NODE, PLUS, 1, Matcher::parse_then(Matcher::kind(EXPR)), |l, r| l + r);
binary!(Sub, SUB_NODE, MINUS, 1, Matcher::parse_then_bound(2, Matcher::kind(EXPR)), |l, r| l - r);
binary!(Mul, MUL_NODE, STAR, 2, Matcher::parse_then(Matcher::kind(EXPR)), |l, r| l * r);

/// Rewrites an expression into itself; never terminates on its own.
#[derive(Debug)]
pub struct Wrap(pub NodeId);

impl NodeKind<Arith> for Wrap {
    fn node_type() -> &'static NodeType {
        &WRAP_NODE
    }

    fn steps() -> StepTable<Self, Arith> {
        StepTable::new().step(EVAL, |wrap, cx| cx.run(wrap.0))
    }
}

impl Production<Arith> for Wrap {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPR).slot("inner", Matcher::kind(EXPR))
    }

    fn build(matched: &Matched<'_, Arith>) -> Result<Self, BuildError> {
        Ok(Wrap(matched.node("inner")?))
    }
}

/// Matches a number only at the very end of the input.
#[derive(Debug)]
pub struct Tail;

impl NodeKind<Arith> for Tail {
    fn node_type() -> &'static NodeType {
        &TAIL_NODE
    }

    fn steps() -> StepTable<Self, Arith> {
        StepTable::new().step(EVAL, |_, _| Ok(-1))
    }
}

impl Production<Arith> for Tail {
    fn pattern() -> Pattern<String> {
        Pattern::new(EXPR)
            .slot("value", Matcher::kind(NUM))
            .slot("end", Matcher::kind(TokenKind::EOF))
    }

    fn build(_: &Matched<'_, Arith>) -> Result<Self, BuildError> {
        Ok(Tail)
    }
}

/// `Num`, `Unit`, `Mul`, `Add`, `Sub`, in that order.
pub fn grammar() -> Grammar<Arith> {
    let mut grammar = Grammar::new();
    grammar
        .add_rule::<Num>()
        .unwrap()
        .add_rule::<Unit>()
        .unwrap()
        .add_rule::<Mul>()
        .unwrap()
        .add_rule::<Add>()
        .unwrap()
        .add_rule::<Sub>()
        .unwrap();
    grammar
}

pub fn parser() -> Parser<Arith> {
    Parser::new(grammar())
}

/// Split on spaces; one token per word, spans in character columns.
pub fn lex(src: &str) -> Vec<Token<String>> {
    let mut tokens = Vec::new();
    let mut column = 0;
    for word in src.split(' ') {
        let width = u32::try_from(word.chars().count()).unwrap();
        if width > 0 {
            let span = Span::new(
                Position::new(1, column),
                Position::new(1, column + width),
                SourceId::new(0),
            );
            let kind = match word {
                "+" => PLUS,
                "-" => MINUS,
                "*" => STAR,
                "," => COMMA,
                w if w.chars().all(|c| c.is_ascii_digit()) => NUM,
                _ => IDENT,
            };
            tokens.push(Token::leaf(kind, word.to_owned(), span));
        }
        column += width + 1;
    }
    tokens
}

/// Fully parenthesized rendering of the tree under `id`.
pub fn render(ast: &Ast<Arith>, id: NodeId) -> String {
    let node = ast.node(id);
    if let Some(num) = node.get::<Num>() {
        return num.0.to_string();
    }
    if node.get::<Unit>().is_some() {
        return "unit".to_owned();
    }
    if let Some(wrap) = node.get::<Wrap>() {
        return format!("[{}]", render(ast, wrap.0));
    }
    let (op, lhs, rhs) = if let Some(add) = node.get::<Add>() {
        ("+", add.lhs, add.rhs)
    } else if let Some(sub) = node.get::<Sub>() {
        ("-", sub.lhs, sub.rhs)
    } else if let Some(mul) = node.get::<Mul>() {
        ("*", mul.lhs, mul.rhs)
    } else {
        return format!("{node:?}");
    };
    format!("({} {op} {})", render(ast, lhs), render(ast, rhs))
}

/// Parse `src` to a single tree and render it.
pub fn parse_render(src: &str) -> String {
    let (ast, root) = parser().parse(lex(src)).unwrap().into_root().unwrap();
    render(&ast, root)
}
