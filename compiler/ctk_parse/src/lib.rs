//! Pattern-based in-place token reducer.
//!
//! A [`Grammar`] is an ordered list of [`Rule`]s. Each rule pairs a
//! [`Pattern`] of named slots with the constructor of one concrete node type
//! (its [`Production`] impl). The [`Parser`] folds matched windows of a
//! token sequence into tree nodes until no rule applies.
//!
//! ```text
//! let mut grammar = Grammar::new();
//! grammar.add_rule::<NumberLiteral>()?.add_rule::<Sum>()?;
//!
//! let output = Parser::new(grammar).parse(tokens)?;
//! let (ast, root) = output.into_root()?;
//! ```

mod error;
mod grammar;
mod matcher;
mod parser;
mod rule;

pub use error::{BuildError, LeftoverTokens, ReduceError};
pub use grammar::Grammar;
pub use matcher::Matcher;
pub use parser::{ParseOutput, Parser, ParserConfig};
pub use rule::{Matched, Pattern, Production, Rule};

#[cfg(test)]
mod test_grammar;
