//! AST arena, node-type hierarchy and compilation-step contract.
//!
//! A grammar declares an abstract node hierarchy whose types name the
//! compilation steps every concrete descendant has to implement. Concrete
//! node types are validated when registered, nodes are stored in an
//! [`Ast`] arena, and a [`Pipeline`] runs the steps in their declared order.

mod ast;
mod error;
mod language;
mod node_type;
mod pipeline;
mod registry;
mod step;

pub use ast::{Ast, NodeRef};
pub use error::{GrammarError, StepError};
pub use language::Language;
pub use node_type::{Ancestry, NodeType, NodeTypeKind, StepDecl};
pub use pipeline::{Pipeline, StepOutputs};
pub use registry::{validate, Concrete, NodeKind, NodeRegistry};
pub use step::{StepCx, StepFn, StepTable};
