//! The AST arena.
//!
//! Nodes live in one flat arena and are addressed by [`NodeId`]. Each node
//! owns the tokens it was reduced from; tokens wrapping a child node carry
//! the child's id, never the child itself. The parent link is a plain id,
//! set once when the consuming node is inserted.
//!
//! Because a node can only consume tokens that existed before it, the tree
//! is acyclic by construction and every child id is smaller than its
//! parent's.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ctk_ir::{NodeId, Span, Token};
use ctk_stack::ensure_sufficient_stack;

use crate::registry::ResolvedSteps;
use crate::{Concrete, Language, NodeKind, NodeType, StepCx, StepDecl, StepError};

/// Type-erased view of a node and its validated steps.
trait ErasedNode<L: Language>: fmt::Debug {
    fn node_type(&self) -> &'static NodeType;

    fn schedule(&self) -> &[StepDecl];

    fn as_any(&self) -> &dyn Any;

    /// `None` when the node's type does not require `cx.step()`.
    fn run(&self, cx: &mut StepCx<'_, L>) -> Option<Result<L::Output, StepError>>;
}

struct Instance<T, L: Language> {
    node: T,
    steps: Arc<ResolvedSteps<T, L>>,
}

impl<T: NodeKind<L>, L: Language> ErasedNode<L> for Instance<T, L> {
    fn node_type(&self) -> &'static NodeType {
        self.steps.node_type
    }

    fn schedule(&self) -> &[StepDecl] {
        &self.steps.schedule
    }

    fn as_any(&self) -> &dyn Any {
        &self.node
    }

    fn run(&self, cx: &mut StepCx<'_, L>) -> Option<Result<L::Output, StepError>> {
        let f = self.steps.find(cx.step())?;
        Some(f(&self.node, cx))
    }
}

impl<T: fmt::Debug, L: Language> fmt::Debug for Instance<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

struct NodeSlot<L: Language> {
    node: Box<dyn ErasedNode<L>>,
    children: Vec<Token<L::Value>>,
    parent: Option<NodeId>,
    span: Span,
}

/// Arena of reduced nodes.
pub struct Ast<L: Language> {
    nodes: Vec<NodeSlot<L>>,
}

impl<L: Language> Ast<L> {
    pub fn new() -> Self {
        Ast { nodes: Vec::new() }
    }

    /// Insert a node built from `children`, taking ownership of them.
    ///
    /// The node's span is the merge of the children's spans. Every child
    /// token wrapping a node gets the new node as its parent.
    ///
    /// # Panics
    /// Panics if a child token wraps a node that is not in this arena or
    /// that already has a parent, or if the arena is full.
    pub fn insert<T: NodeKind<L>>(
        &mut self,
        concrete: &Concrete<T, L>,
        node: T,
        children: Vec<Token<L::Value>>,
    ) -> NodeId {
        let id = NodeId::new(
            u32::try_from(self.nodes.len())
                .unwrap_or_else(|_| panic!("AST exceeds {} nodes", u32::MAX)),
        );

        for child in children.iter().filter_map(Token::node_id) {
            let slot = &mut self.nodes[child.index()];
            assert!(
                slot.parent.is_none(),
                "{child:?} is already owned by {:?}",
                slot.parent
            );
            slot.parent = Some(id);
        }

        let span = Span::covering(&children);
        self.nodes.push(NodeSlot {
            node: Box::new(Instance {
                node,
                steps: Arc::clone(&concrete.steps),
            }),
            children,
            parent: None,
            span,
        });
        id
    }

    fn slot(&self, id: NodeId) -> &NodeSlot<L> {
        &self.nodes[id.index()]
    }

    /// # Panics
    /// Panics if `id` is not in this arena.
    pub fn node(&self, id: NodeId) -> NodeRef<'_, L> {
        assert!(id.index() < self.nodes.len(), "{id:?} is not in this AST");
        NodeRef { ast: self, id }
    }

    pub fn try_node(&self, id: NodeId) -> Option<NodeRef<'_, L>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { ast: self, id })
    }

    /// The node as its concrete Rust type.
    pub fn get<T: NodeKind<L>>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.index())?.node.as_any().downcast_ref::<T>()
    }

    pub fn node_type(&self, id: NodeId) -> &'static NodeType {
        self.slot(id).node.node_type()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    /// The tokens the node was reduced from.
    pub fn children(&self, id: NodeId) -> &[Token<L::Value>] {
        &self.slot(id).children
    }

    /// Ids of the child nodes, left to right.
    pub fn child_ids(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.slot(id).children.iter().filter_map(Token::node_id)
    }

    /// Merge of all child token spans.
    pub fn span(&self, id: NodeId) -> Span {
        self.slot(id).span
    }

    /// Same as [`Ast::span`].
    pub fn position(&self, id: NodeId) -> Span {
        self.span(id)
    }

    /// Steps of the node's type, in execution order.
    pub fn schedule(&self, id: NodeId) -> &[StepDecl] {
        self.slot(id).node.schedule()
    }

    /// Nodes that no other node has consumed, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|id| self.parent(*id).is_none())
    }

    /// Every node id, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        let len = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        (0..len).map(NodeId::new)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply `visit` to `root` and every node below it, pre-order.
    ///
    /// A node comes before its children, and children come left to right.
    /// The traversal runs to completion; filter the result to select nodes.
    pub fn walk<'a, S>(&'a self, root: NodeId, mut visit: impl FnMut(NodeRef<'a, L>) -> S) -> Vec<S> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(visit(self.node(id)));
            stack.extend(self.child_ids(id).rev());
        }
        out
    }

    /// Ids of the nodes under `root` (inclusive) whose type is `ty` or
    /// descends from it, pre-order.
    pub fn collect(&self, root: NodeId, ty: &NodeType) -> Vec<NodeId> {
        self.walk(root, |node| node.is_a(ty).then_some(node.id()))
            .into_iter()
            .flatten()
            .collect()
    }

    /// Nodes under `root` (inclusive) implemented by the Rust type `T`, pre-order.
    pub fn collect_typed<T: NodeKind<L>>(&self, root: NodeId) -> Vec<(NodeId, &T)> {
        self.walk(root, |node| node.get::<T>().map(|n| (node.id(), n)))
            .into_iter()
            .flatten()
            .collect()
    }

    /// Run one compilation step on one node.
    ///
    /// Steps usually recurse into their children through
    /// [`StepCx::run`]; the recursion runs under a stack guard.
    pub fn run_step(
        &self,
        id: NodeId,
        step: StepDecl,
        ctx: &mut L::Context,
    ) -> Result<L::Output, StepError> {
        let slot = self.slot(id);
        let mut cx = StepCx::new(self, id, step, ctx);
        ensure_sufficient_stack(|| slot.node.run(&mut cx)).unwrap_or_else(|| {
            Err(StepError::NotScheduled {
                node: slot.node.node_type().name(),
                step: step.name(),
                span: slot.span,
            })
        })
    }
}

impl<L: Language> Default for Ast<L> {
    fn default() -> Self {
        Ast::new()
    }
}

impl<L: Language> fmt::Debug for Ast<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes.iter().map(|slot| &slot.node))
            .finish()
    }
}

/// Borrowed handle to one node of an [`Ast`].
pub struct NodeRef<'a, L: Language> {
    ast: &'a Ast<L>,
    id: NodeId,
}

impl<'a, L: Language> NodeRef<'a, L> {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ast(&self) -> &'a Ast<L> {
        self.ast
    }

    pub fn node_type(&self) -> &'static NodeType {
        self.ast.node_type(self.id)
    }

    /// Check if the node's type is `ty` or descends from it.
    pub fn is_a(&self, ty: &NodeType) -> bool {
        self.node_type().is_a(ty)
    }

    pub fn get<T: NodeKind<L>>(&self) -> Option<&'a T> {
        self.ast.get::<T>(self.id)
    }

    pub fn span(&self) -> Span {
        self.ast.span(self.id)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, L>> {
        self.ast.parent(self.id).map(|id| self.ast.node(id))
    }

    pub fn children(&self) -> &'a [Token<L::Value>] {
        self.ast.children(self.id)
    }

    /// Child nodes, left to right.
    pub fn child_nodes(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a, L>> + 'a {
        let ast = self.ast;
        ast.child_ids(self.id).map(move |id| NodeRef { ast, id })
    }
}

impl<L: Language> Clone for NodeRef<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Language> Copy for NodeRef<'_, L> {}

impl<L: Language> fmt::Debug for NodeRef<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.ast.slot(self.id).node, f)
    }
}
