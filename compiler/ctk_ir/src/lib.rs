//! ctk IR - shared value types
//!
//! This crate contains the data every other ctk crate speaks:
//! - Positions and spans for source locations
//! - Source units and their ids
//! - Nominal token kinds, tagged payloads and tokens
//! - `NodeId`, the handle tokens use to wrap reduced subtrees
//!
//! # Design Philosophy
//!
//! - **Immutable values**: tokens and spans never change after construction
//! - **Flat trees**: tokens carry `NodeId(u32)` indices, never boxed nodes
//! - **Explicit tags**: payloads are `Leaf`/`Node`/`Empty`, so consumers
//!   dispatch on a tag rather than on runtime type checks

mod node_id;
mod source;
mod span;
mod token;
mod traits;

pub use node_id::NodeId;
pub use source::{Source, SourceId};
pub use span::{Position, Span};
pub use token::{Payload, Token, TokenKind};
pub use traits::Spanned;
