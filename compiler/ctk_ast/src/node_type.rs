//! Node-type hierarchy and compilation-step declarations.
//!
//! A grammar declares its node hierarchy as `static` [`NodeType`] items that
//! point at their parent. Abstract types declare the compilation steps every
//! concrete descendant has to implement, each with a global order index:
//!
//! ```text
//! pub const ANALYZE_TYPES: StepDecl = StepDecl::new("analyze_types", 0);
//! pub const COMPILE: StepDecl = StepDecl::new("compile", 1);
//!
//! pub static AST_NODE: NodeType = NodeType::root("AstNode", &[ANALYZE_TYPES, COMPILE]);
//! pub static EXPRESSION: NodeType = NodeType::abstract_child("Expression", &AST_NODE, &[]);
//! pub static SUM: NodeType = NodeType::concrete("Sum", &EXPRESSION);
//! ```
//!
//! Node types compare by identity, so they must be `static`, not `const`.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::GrammarError;

/// A named compilation step with its global execution index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StepDecl {
    name: &'static str,
    order: u32,
}

impl StepDecl {
    pub const fn new(name: &'static str, order: u32) -> Self {
        StepDecl { name, order }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn order(&self) -> u32 {
        self.order
    }
}

impl fmt::Display for StepDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Whether a node type can be instantiated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTypeKind {
    Abstract,
    Concrete,
}

/// One type in a grammar's node hierarchy.
pub struct NodeType {
    name: &'static str,
    parent: Option<&'static NodeType>,
    steps: &'static [StepDecl],
    kind: NodeTypeKind,
}

impl NodeType {
    /// Abstract base of a hierarchy.
    pub const fn root(name: &'static str, steps: &'static [StepDecl]) -> Self {
        NodeType {
            name,
            parent: None,
            steps,
            kind: NodeTypeKind::Abstract,
        }
    }

    /// Abstract intermediate type. `steps` may be empty.
    pub const fn abstract_child(
        name: &'static str,
        parent: &'static NodeType,
        steps: &'static [StepDecl],
    ) -> Self {
        NodeType {
            name,
            parent: Some(parent),
            steps,
            kind: NodeTypeKind::Abstract,
        }
    }

    /// Instantiable leaf type.
    pub const fn concrete(name: &'static str, parent: &'static NodeType) -> Self {
        NodeType {
            name,
            parent: Some(parent),
            steps: &[],
            kind: NodeTypeKind::Concrete,
        }
    }

    /// Declare additional steps on this type.
    #[must_use]
    pub const fn with_steps(self, steps: &'static [StepDecl]) -> Self {
        NodeType {
            name: self.name,
            parent: self.parent,
            steps,
            kind: self.kind,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn parent(&self) -> Option<&'static NodeType> {
        self.parent
    }

    /// Steps declared directly on this type.
    #[inline]
    pub const fn declared_steps(&self) -> &'static [StepDecl] {
        self.steps
    }

    #[inline]
    pub const fn kind(&self) -> NodeTypeKind {
        self.kind
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.kind == NodeTypeKind::Abstract
    }

    /// This type followed by its ancestors, nearest first.
    pub fn ancestry(&'static self) -> Ancestry {
        Ancestry { next: Some(self) }
    }

    /// Check if this type is `other` or descends from it.
    pub fn is_a(&'static self, other: &NodeType) -> bool {
        self.ancestry().any(|ty| std::ptr::eq(ty, other))
    }

    /// Every step this type must implement, in execution order.
    ///
    /// The union of the steps declared along the ancestry, sorted by order
    /// index. Equal indices run ancestor first, then in declaration order.
    pub fn required_steps(&'static self) -> Result<Vec<StepDecl>, GrammarError> {
        let mut chain: Vec<&'static NodeType> = self.ancestry().collect();
        chain.reverse();

        let mut steps: Vec<(StepDecl, &'static NodeType)> = Vec::new();
        for ty in chain {
            for step in ty.steps {
                if let Some((_, first)) = steps.iter().find(|(s, _)| s.name == step.name) {
                    return Err(GrammarError::DuplicateStep {
                        step: step.name,
                        first: first.name,
                        second: ty.name,
                    });
                }
                steps.push((*step, ty));
            }
        }

        let mut steps: Vec<StepDecl> = steps.into_iter().map(|(step, _)| step).collect();
        steps.sort_by_key(StepDecl::order);
        Ok(steps)
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for NodeType {}

impl Hash for NodeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Iterator over a node type and its ancestors.
pub struct Ancestry {
    next: Option<&'static NodeType>,
}

impl Iterator for Ancestry {
    type Item = &'static NodeType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}

#[cfg(test)]
mod tests;
