//! Ordered rule lists.

use std::fmt;

use ctk_ast::{GrammarError, Language, NodeRegistry};
use tracing::debug;

use crate::{Pattern, Production, Rule};

/// The rules of one grammar, in registration order.
///
/// Registration order is the reducer's tie-break: at any offset the first
/// matching rule wins. Every node type is validated against its step
/// contract when its first rule is added.
pub struct Grammar<L: Language> {
    registry: NodeRegistry<L>,
    rules: Vec<Rule<L>>,
}

impl<L: Language> Grammar<L> {
    pub fn new() -> Self {
        Grammar {
            registry: NodeRegistry::new(),
            rules: Vec::new(),
        }
    }

    /// Add a rule for `T` using [`Production::pattern`].
    pub fn add_rule<T: Production<L>>(&mut self) -> Result<&mut Self, GrammarError> {
        self.add_rule_with::<T>(T::pattern())
    }

    /// Add a rule for `T` with an alternative pattern.
    pub fn add_rule_with<T: Production<L>>(
        &mut self,
        pattern: Pattern<L::Value>,
    ) -> Result<&mut Self, GrammarError> {
        let concrete = self.registry.register::<T>()?;
        if pattern.is_empty() {
            return Err(GrammarError::EmptyPattern {
                node: concrete.node_type().name(),
            });
        }

        debug!(
            rule = concrete.node_type().name(),
            slots = pattern.len(),
            precedence = ?pattern.precedence(),
            "added rule"
        );
        self.rules.push(Rule::new(concrete, pattern));
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule<L>] {
        &self.rules
    }

    /// Node types validated so far.
    pub fn registry(&self) -> &NodeRegistry<L> {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<L: Language> Default for Grammar<L> {
    fn default() -> Self {
        Grammar::new()
    }
}

impl<L: Language> fmt::Debug for Grammar<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}
