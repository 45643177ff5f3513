//! Rule registries
//!
//! A rule name resolves through three tiers, first match wins:
//!
//! 1. **instance** rules registered on one validator
//! 2. **global** rules from an explicitly injected, shared [`RuleSet`]
//! 3. **built-in** rules shipped with the crate
//!
//! The global tier is an ordinary [`RuleSet`] wrapped in an `Arc`. Fill it
//! through its `&mut self` registration methods at startup, then freeze it
//! by sharing: once it sits behind an `Arc` it can no longer change, so
//! concurrent validations never observe a half-registered rule.
//!
//! # Examples
//!
//! ```
//! use nebula_rules::registry::{RuleRegistry, RuleSet, RuleTier};
//! use nebula_rules::rule::{Rule, RuleContext};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default)]
//! struct Slug;
//!
//! impl Rule for Slug {
//!     fn execute(&self, cx: &mut RuleContext<'_>) {
//!         let holds = cx.value().as_str().is_some_and(|s| {
//!             s.chars().all(|c| c.is_ascii_lowercase() || c == '-')
//!         });
//!         cx.expect(holds, "The :attribute must be a slug.", "The :attribute must not be a slug.");
//!     }
//! }
//!
//! let mut global = RuleSet::new();
//! global.register_rule::<Slug>("slug");
//! let global = Arc::new(global);
//!
//! let local = RuleSet::new();
//! let registry = RuleRegistry::new(&local, Some(&*global));
//! assert_eq!(registry.tier_of("slug"), Some(RuleTier::Global));
//! assert_eq!(registry.tier_of("required"), Some(RuleTier::Builtin));
//! ```

use crate::rule::Rule;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Produces a fresh rule instance per invocation.
pub type RuleFactory = Arc<dyn Fn() -> Box<dyn Rule> + Send + Sync>;

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| {
    let mut set = RuleSet::new();
    crate::rules::register_builtin(&mut set);
    set
});

// ============================================================================
// RULE SET
// ============================================================================

/// One registry tier: named rule factories plus message templates.
#[derive(Clone, Default)]
pub struct RuleSet {
    factories: HashMap<String, RuleFactory>,
    messages: HashMap<String, String>,
}

impl RuleSet {
    /// Creates an empty tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tier.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Registers a factory under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Rule> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Registers a rule type constructed through `Default`.
    pub fn register_rule<R>(&mut self, name: impl Into<String>) -> &mut Self
    where
        R: Rule + Default + 'static,
    {
        self.register(name, || Box::new(R::default()) as Box<dyn Rule>)
    }

    /// Registers a message template under `code`, `field.code` or their `!` forms.
    pub fn register_message(
        &mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> &mut Self {
        self.messages.insert(key.into(), template.into());
        self
    }

    /// Returns true if a rule is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Looks up a factory.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleFactory> {
        self.factories.get(name)
    }

    /// Looks up a message template.
    #[must_use]
    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.names())
            .field("messages", &self.messages)
            .finish()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Tier a rule name resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTier {
    /// Registered on the validator itself.
    Instance,
    /// Registered on the shared global set.
    Global,
    /// Shipped with the crate.
    Builtin,
}

/// Three-tier view used during one validation pass.
#[derive(Debug, Clone, Copy)]
pub struct RuleRegistry<'a> {
    local: &'a RuleSet,
    global: Option<&'a RuleSet>,
}

impl<'a> RuleRegistry<'a> {
    /// Composes the instance tier with an optional global tier.
    pub fn new(local: &'a RuleSet, global: Option<&'a RuleSet>) -> Self {
        Self { local, global }
    }

    /// Resolves a name to its factory and tier.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<(RuleTier, &'a RuleFactory)> {
        if let Some(factory) = self.local.get(name) {
            return Some((RuleTier::Instance, factory));
        }
        if let Some(factory) = self.global.and_then(|global| global.get(name)) {
            return Some((RuleTier::Global, factory));
        }
        RuleSet::builtin()
            .get(name)
            .map(|factory| (RuleTier::Builtin, factory))
    }

    /// Returns the tier a name resolves from.
    #[must_use]
    pub fn tier_of(&self, name: &str) -> Option<RuleTier> {
        self.resolve(name).map(|(tier, _)| tier)
    }

    /// Returns true if any tier knows `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Creates a fresh rule instance.
    #[must_use]
    pub fn create(&self, name: &str) -> Option<Box<dyn Rule>> {
        self.resolve(name).map(|(_, factory)| factory())
    }

    /// The global tier, if one was injected.
    #[must_use]
    pub fn global(&self) -> Option<&'a RuleSet> {
        self.global
    }
}
