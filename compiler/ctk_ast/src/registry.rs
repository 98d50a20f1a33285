//! Node-type validation.
//!
//! A concrete node type is checked once, when it is registered: every step
//! its ancestry requires must be in its step table, and nothing else may be.
//! Registration hands back a [`Concrete`] handle, and an [`Ast`](crate::Ast)
//! only accepts nodes through such a handle, so a type that fails
//! validation can never be instantiated.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{GrammarError, Language, NodeType, StepDecl, StepFn, StepTable};

/// A Rust type implementing one node type of a grammar.
pub trait NodeKind<L: Language>: fmt::Debug + Sized + 'static {
    /// The node type this Rust type implements.
    fn node_type() -> &'static NodeType;

    /// The steps this type implements.
    fn steps() -> StepTable<Self, L>;
}

/// Steps of a validated type, in execution order.
pub(crate) struct ResolvedSteps<T, L: Language> {
    pub(crate) node_type: &'static NodeType,
    pub(crate) schedule: Vec<StepDecl>,
    pub(crate) fns: Vec<StepFn<T, L>>,
}

impl<T, L: Language> ResolvedSteps<T, L> {
    pub(crate) fn find(&self, step: StepDecl) -> Option<StepFn<T, L>> {
        self.schedule
            .iter()
            .position(|s| s.name() == step.name())
            .map(|index| self.fns[index])
    }
}

/// Proof that `T` passed validation; required to insert a `T` into an `Ast`.
pub struct Concrete<T, L: Language> {
    pub(crate) steps: Arc<ResolvedSteps<T, L>>,
}

impl<T, L: Language> Concrete<T, L> {
    pub fn node_type(&self) -> &'static NodeType {
        self.steps.node_type
    }

    /// Steps of `T` in execution order.
    pub fn schedule(&self) -> &[StepDecl] {
        &self.steps.schedule
    }
}

impl<T, L: Language> Clone for Concrete<T, L> {
    fn clone(&self) -> Self {
        Concrete {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<T, L: Language> fmt::Debug for Concrete<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concrete")
            .field("node_type", &self.steps.node_type)
            .field("schedule", &self.steps.schedule)
            .finish()
    }
}

/// Validate `T` against the steps its ancestry requires.
pub fn validate<T: NodeKind<L>, L: Language>() -> Result<Concrete<T, L>, GrammarError> {
    let node_type = T::node_type();
    if node_type.is_abstract() {
        return Err(GrammarError::AbstractType {
            node: node_type.name(),
        });
    }

    let required = node_type.required_steps()?;
    let table = T::steps();

    if let Some(step) = table
        .names()
        .find(|name| !required.iter().any(|r| r.name() == *name))
    {
        return Err(GrammarError::UnknownStep {
            node: node_type.name(),
            step,
        });
    }

    let mut fns = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for step in &required {
        match table.get(step.name()) {
            Some(f) => fns.push(f),
            None => missing.push(step.name()),
        }
    }
    if !missing.is_empty() {
        return Err(GrammarError::MissingSteps {
            node: node_type.name(),
            missing,
        });
    }

    debug!(
        node = node_type.name(),
        steps = ?required.iter().map(StepDecl::name).collect::<Vec<_>>(),
        "validated node type"
    );

    Ok(Concrete {
        steps: Arc::new(ResolvedSteps {
            node_type,
            schedule: required,
            fns,
        }),
    })
}

/// Remembers the outcome of validating each node type.
///
/// A type is validated the first time it is registered. Both outcomes are
/// cached: a valid type hands out clones of the same handle, an invalid one
/// keeps failing with the same error.
pub struct NodeRegistry<L: Language> {
    valid: FxHashMap<TypeId, Box<dyn Any>>,
    invalid: FxHashMap<TypeId, GrammarError>,
    order: Vec<&'static NodeType>,
    _language: std::marker::PhantomData<fn() -> L>,
}

impl<L: Language> NodeRegistry<L> {
    pub fn new() -> Self {
        NodeRegistry {
            valid: FxHashMap::default(),
            invalid: FxHashMap::default(),
            order: Vec::new(),
            _language: std::marker::PhantomData,
        }
    }

    /// Validate `T` (once) and return its handle.
    pub fn register<T: NodeKind<L>>(&mut self) -> Result<Concrete<T, L>, GrammarError> {
        let key = TypeId::of::<T>();

        if let Some(handle) = self
            .valid
            .get(&key)
            .and_then(|any| any.downcast_ref::<Concrete<T, L>>())
        {
            return Ok(handle.clone());
        }
        if let Some(err) = self.invalid.get(&key) {
            return Err(err.clone());
        }

        match validate::<T, L>() {
            Ok(handle) => {
                self.valid.insert(key, Box::new(handle.clone()));
                self.order.push(handle.node_type());
                Ok(handle)
            }
            Err(err) => {
                debug!(node = T::node_type().name(), error = %err, "node type rejected");
                self.invalid.insert(key, err.clone());
                Err(err)
            }
        }
    }

    pub fn is_registered<T: NodeKind<L>>(&self) -> bool {
        self.valid.contains_key(&TypeId::of::<T>())
    }

    /// Valid node types, in registration order.
    pub fn node_types(&self) -> &[&'static NodeType] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<L: Language> Default for NodeRegistry<L> {
    fn default() -> Self {
        NodeRegistry::new()
    }
}

impl<L: Language> fmt::Debug for NodeRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("valid", &self.order)
            .field("invalid", &self.invalid.values().collect::<Vec<_>>())
            .finish()
    }
}
