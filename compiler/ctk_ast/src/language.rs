//! The associated types a grammar plugs into the toolkit.

use std::fmt;

/// Groups the types one grammar threads through tokens, nodes and steps.
///
/// Implemented by a (usually zero-sized) marker type per grammar:
///
/// ```text
/// pub struct Calc;
///
/// impl Language for Calc {
///     type Value = String;
///     type Context = TypeContext;
///     type Output = Value;
/// }
/// ```
pub trait Language: 'static {
    /// Lexical payload carried by leaf tokens.
    type Value: Clone + PartialEq + fmt::Debug;

    /// Compilation context passed to every step. The toolkit never looks inside.
    type Context;

    /// What a compilation step returns.
    type Output;
}
