//! Calculator types, values and the analysis context.

use std::fmt;

use ctk_ir::NodeId;
use rustc_hash::FxHashMap;

/// Type of an expression.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Integer,
    Boolean,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => f.write_str("integer"),
            Type::Boolean => f.write_str("boolean"),
        }
    }
}

/// What a compilation step returns.
///
/// `analyze_types` returns `Unit`; `compile` returns the folded value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Unit,
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// State shared by all steps of one compilation.
///
/// Nodes are immutable once built, so the type each expression resolves to
/// lives here, keyed by node.
#[derive(Clone, Debug, Default)]
pub struct TypeContext {
    types: FxHashMap<NodeId, Type>,
}

impl TypeContext {
    pub fn new() -> Self {
        TypeContext::default()
    }

    pub fn record(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }

    /// The type `analyze_types` resolved for `id`, if it has run.
    pub fn type_of(&self, id: NodeId) -> Option<Type> {
        self.types.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
