//! Step tables and the per-invocation step context.

use std::fmt;

use ctk_ir::{NodeId, Span};

use crate::{Ast, Language, NodeRef, StepDecl, StepError};

/// Signature of a compilation step implemented by node type `T`.
pub type StepFn<T, L> =
    fn(&T, &mut StepCx<'_, L>) -> Result<<L as Language>::Output, StepError>;

/// The compilation steps a concrete node type implements, keyed by name.
///
/// Steps provided by an intermediate type are shared through [`inherit`]:
///
/// ```text
/// fn steps() -> StepTable<Self, Calc> {
///     StepTable::new()
///         .step(COMPILE, Self::compile)
///         .inherit(literal_defaults())
/// }
/// ```
///
/// [`inherit`]: StepTable::inherit
pub struct StepTable<T, L: Language> {
    entries: Vec<(&'static str, StepFn<T, L>)>,
}

impl<T, L: Language> StepTable<T, L> {
    pub fn new() -> Self {
        StepTable {
            entries: Vec::new(),
        }
    }

    /// Implement (or override) `decl`.
    #[must_use]
    pub fn step(mut self, decl: StepDecl, f: StepFn<T, L>) -> Self {
        match self.entries.iter_mut().find(|(name, _)| *name == decl.name()) {
            Some(entry) => entry.1 = f,
            None => self.entries.push((decl.name(), f)),
        }
        self
    }

    /// Take every step of `inherited` this table does not implement itself.
    #[must_use]
    pub fn inherit(mut self, inherited: StepTable<T, L>) -> Self {
        for (name, f) in inherited.entries {
            if self.get(name).is_none() {
                self.entries.push((name, f));
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<StepFn<T, L>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, f)| *f)
    }

    /// Implemented step names, in the order they were added.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, L: Language> Default for StepTable<T, L> {
    fn default() -> Self {
        StepTable::new()
    }
}

impl<T, L: Language> Clone for StepTable<T, L> {
    fn clone(&self) -> Self {
        StepTable {
            entries: self.entries.clone(),
        }
    }
}

impl<T, L: Language> fmt::Debug for StepTable<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Handle passed to a step implementation.
///
/// Gives access to the node being processed, the tree, and the caller's
/// compilation context, and runs steps on child nodes.
pub struct StepCx<'a, L: Language> {
    ast: &'a Ast<L>,
    id: NodeId,
    step: StepDecl,
    ctx: &'a mut L::Context,
}

impl<'a, L: Language> StepCx<'a, L> {
    pub(crate) fn new(ast: &'a Ast<L>, id: NodeId, step: StepDecl, ctx: &'a mut L::Context) -> Self {
        StepCx { ast, id, step, ctx }
    }

    /// The node the step runs on.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The step being run.
    #[inline]
    pub fn step(&self) -> StepDecl {
        self.step
    }

    #[inline]
    pub fn ast(&self) -> &'a Ast<L> {
        self.ast
    }

    pub fn node(&self) -> NodeRef<'a, L> {
        self.ast.node(self.id)
    }

    /// Span of the current node.
    pub fn span(&self) -> Span {
        self.ast.span(self.id)
    }

    /// The caller's compilation context.
    pub fn context(&mut self) -> &mut L::Context {
        self.ctx
    }

    /// Run the current step on `child`.
    pub fn run(&mut self, child: NodeId) -> Result<L::Output, StepError> {
        self.ast.run_step(child, self.step, self.ctx)
    }

    /// Run a different step on `node`.
    pub fn run_step(&mut self, node: NodeId, step: StepDecl) -> Result<L::Output, StepError> {
        self.ast.run_step(node, step, self.ctx)
    }

    /// A step failure located at the current node.
    pub fn error(&self, message: impl Into<String>) -> StepError {
        StepError::new(message, self.span())
    }
}
