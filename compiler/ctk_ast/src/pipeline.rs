//! Step scheduling over top-level nodes.
//!
//! A pipeline runs each compilation step of a hierarchy over a list of root
//! nodes: every root goes through step `k` before any root starts step
//! `k + 1`. Individual steps are expected to recurse into their own children.

use ctk_ir::NodeId;
use tracing::{debug, trace};

use crate::{Ast, GrammarError, Language, NodeType, StepDecl, StepError};

/// The outputs one step produced, one per root, in root order.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutputs<O> {
    pub step: StepDecl,
    pub outputs: Vec<O>,
}

/// Execution order of the steps a node type requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<StepDecl>,
}

impl Pipeline {
    /// Steps required by `ty` and its ancestors, in order.
    ///
    /// Usually built from the root of the hierarchy, whose steps every
    /// concrete node implements.
    pub fn for_type(ty: &'static NodeType) -> Result<Self, GrammarError> {
        Ok(Pipeline {
            steps: ty.required_steps()?,
        })
    }

    /// A pipeline running exactly `steps`, sorted by order index.
    pub fn new(mut steps: Vec<StepDecl>) -> Self {
        steps.sort_by_key(StepDecl::order);
        Pipeline { steps }
    }

    pub fn steps(&self) -> &[StepDecl] {
        &self.steps
    }

    /// Run every step over all `roots`, step-major.
    ///
    /// Stops at the first error; outputs of earlier steps are dropped.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn run<L: Language>(
        &self,
        ast: &Ast<L>,
        roots: &[NodeId],
        ctx: &mut L::Context,
    ) -> Result<Vec<StepOutputs<L::Output>>, StepError> {
        let mut results = Vec::with_capacity(self.steps.len());
        for &step in &self.steps {
            debug!(step = step.name(), "running step");
            let mut outputs = Vec::with_capacity(roots.len());
            for &root in roots {
                trace!(step = step.name(), node = %ast.node_type(root), "step on root");
                outputs.push(ast.run_step(root, step, ctx)?);
            }
            results.push(StepOutputs { step, outputs });
        }
        Ok(results)
    }

    /// Run the whole pipeline on each root separately.
    ///
    /// A failing root does not stop the others: each entry is that root's
    /// outputs in step order, or the first error it hit.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn run_units<L: Language>(
        &self,
        ast: &Ast<L>,
        roots: &[NodeId],
        ctx: &mut L::Context,
    ) -> Vec<Result<Vec<L::Output>, StepError>> {
        roots
            .iter()
            .map(|&root| {
                let result = self
                    .steps
                    .iter()
                    .map(|&step| ast.run_step(root, step, ctx))
                    .collect::<Result<Vec<_>, _>>();
                if let Err(err) = &result {
                    debug!(node = %ast.node_type(root), error = %err, "unit failed");
                }
                result
            })
            .collect()
    }
}
