use crate::dsl::ConfigSource;
use crate::registry::{RuleRegistry, RuleSet};
use crate::rule::{MessageScope, Messages};
use std::fmt;
use std::sync::Arc;

/// Registry tiers, messages and config shared by both runner kinds.
#[derive(Clone, Default)]
pub(crate) struct Settings {
    pub(crate) messages: Messages,
    pub(crate) local: RuleSet,
    pub(crate) global: Option<Arc<RuleSet>>,
    pub(crate) config: Option<Arc<dyn ConfigSource>>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("messages", &self.messages)
            .field("local", &self.local)
            .field("global", &self.global)
            .field("config", &self.config.is_some())
            .finish()
    }
}

impl Settings {
    /// Borrows the settings for one pass.
    ///
    /// Nested runners without their own global tier or config source fall
    /// back to the parent's. Labels, messages and transformers the runner
    /// does not override come from the parent as well.
    pub(crate) fn env<'a>(&'a self, parent: Option<&'a Env<'a>>) -> Env<'a> {
        let global = self
            .global
            .as_deref()
            .or_else(|| parent.and_then(|env| env.global));
        let mut scope = MessageScope::new(Some(&self.messages), global);
        if let Some(parent) = parent {
            scope = scope.with_parent(&parent.scope);
        }
        Env {
            local: &self.local,
            global,
            scope,
            config: self
                .config
                .as_deref()
                .or_else(|| parent.and_then(|env| env.config)),
        }
    }
}

/// Borrowed view of [`Settings`] for one validation pass.
#[derive(Clone, Copy)]
pub(crate) struct Env<'a> {
    pub(crate) local: &'a RuleSet,
    pub(crate) global: Option<&'a RuleSet>,
    pub(crate) scope: MessageScope<'a>,
    pub(crate) config: Option<&'a dyn ConfigSource>,
}

impl<'a> Env<'a> {
    pub(crate) fn registry(&self) -> RuleRegistry<'a> {
        RuleRegistry::new(self.local, self.global)
    }

    pub(crate) const fn scope(&self) -> MessageScope<'a> {
        self.scope
    }
}

/// Generates the configuration setters shared by [`super::Validator`] and
/// [`super::ValidatorIterator`]. Each setter comes as `set_*` (in place) and
/// `with_*` (builder).
macro_rules! settings_methods {
    () => {
        /// Overrides the display label of fields.
        pub fn set_labels<K, V>(&mut self, labels: impl IntoIterator<Item = (K, V)>) -> &mut Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            for (field, label) in labels {
                self.settings.messages.set_label(field, label);
            }
            self
        }

        /// Builder form of [`Self::set_labels`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_labels<K, V>(mut self, labels: impl IntoIterator<Item = (K, V)>) -> Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            self.set_labels(labels);
            self
        }

        /// Overrides message templates.
        ///
        /// Keys are `field.rule`, `rule`, or their negated forms `field.!rule`
        /// and `!rule`.
        pub fn set_messages<K, V>(&mut self, messages: impl IntoIterator<Item = (K, V)>) -> &mut Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            for (key, template) in messages {
                self.settings.messages.set_message(key, template);
            }
            self
        }

        /// Builder form of [`Self::set_messages`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_messages<K, V>(mut self, messages: impl IntoIterator<Item = (K, V)>) -> Self
        where
            K: Into<String>,
            V: Into<String>,
        {
            self.set_messages(messages);
            self
        }

        /// Registers a transformer for a message placeholder.
        ///
        /// `key` is `field.rule`, `rule` or `field`.
        pub fn set_attribute_transformer<F>(
            &mut self,
            key: impl Into<String>,
            placeholder: impl Into<String>,
            transformer: F,
        ) -> &mut Self
        where
            F: Fn(&str) -> String + Send + Sync + 'static,
        {
            let transformer: $crate::rule::AttributeTransformer = std::sync::Arc::new(transformer);
            self.settings
                .messages
                .set_transformer(key, placeholder, transformer);
            self
        }

        /// Builder form of [`Self::set_attribute_transformer`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_attribute_transformer<F>(
            mut self,
            key: impl Into<String>,
            placeholder: impl Into<String>,
            transformer: F,
        ) -> Self
        where
            F: Fn(&str) -> String + Send + Sync + 'static,
        {
            self.set_attribute_transformer(key, placeholder, transformer);
            self
        }

        /// Registers a rule in this runner's own tier, shadowing global and
        /// built-in rules of the same name.
        pub fn add_custom_rule<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
        where
            F: Fn() -> Box<dyn $crate::rule::Rule> + Send + Sync + 'static,
        {
            self.settings.local.register(name, factory);
            self
        }

        /// Builder form of [`Self::add_custom_rule`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_rule<F>(mut self, name: impl Into<String>, factory: F) -> Self
        where
            F: Fn() -> Box<dyn $crate::rule::Rule> + Send + Sync + 'static,
        {
            self.add_custom_rule(name, factory);
            self
        }

        /// Registers a `Default`-constructed rule type in this runner's tier.
        #[must_use = "builder methods must be chained or built"]
        pub fn with_rule_type<R>(mut self, name: impl Into<String>) -> Self
        where
            R: $crate::rule::Rule + Default + 'static,
        {
            self.settings.local.register_rule::<R>(name);
            self
        }

        /// Injects the shared global tier.
        pub fn set_global(&mut self, global: std::sync::Arc<$crate::registry::RuleSet>) -> &mut Self {
            self.settings.global = Some(global);
            self
        }

        /// Builder form of [`Self::set_global`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_global(mut self, global: std::sync::Arc<$crate::registry::RuleSet>) -> Self {
            self.set_global(global);
            self
        }

        /// Sets the source consulted by `#key` arguments.
        pub fn set_config(
            &mut self,
            config: std::sync::Arc<dyn $crate::dsl::ConfigSource>,
        ) -> &mut Self {
            self.settings.config = Some(config);
            self
        }

        /// Builder form of [`Self::set_config`].
        #[must_use = "builder methods must be chained or built"]
        pub fn with_config(mut self, config: std::sync::Arc<dyn $crate::dsl::ConfigSource>) -> Self {
            self.set_config(config);
            self
        }
    };
}

pub(crate) use settings_methods;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Value;
    use crate::rule::Rule;
    use std::collections::HashMap;

    #[test]
    fn test_env_inherits_missing_parts_from_parent() {
        let mut parent = Settings::default();
        parent.global = Some(Arc::new(RuleSet::new()));
        let config: HashMap<String, Value> = HashMap::new();
        parent.config = Some(Arc::new(config));

        let child = Settings::default();
        let parent_env = parent.env(None);
        let env = child.env(Some(&parent_env));
        assert!(env.global.is_some());
        assert!(env.config.is_some());

        let orphan = child.env(None);
        assert!(orphan.global.is_none());
        assert!(orphan.config.is_none());
    }

    #[test]
    fn test_env_inherits_parent_labels() {
        let mut parent = Settings::default();
        parent.messages.set_label("qty", "quantity");
        parent.messages.set_label("sku", "stock code");
        let mut child = Settings::default();
        child.messages.set_label("sku", "SKU");

        let parent_env = parent.env(None);
        let env = child.env(Some(&parent_env));
        assert_eq!(env.scope().label("qty"), "quantity");
        assert_eq!(env.scope().label("sku"), "SKU");
        assert_eq!(child.env(None).scope().label("qty"), "qty");
    }

    #[test]
    fn test_registry_sees_local_tier() {
        #[derive(Debug, Default)]
        struct Noop;
        impl Rule for Noop {
            fn execute(&self, _: &mut crate::rule::RuleContext<'_>) {}
        }

        let mut settings = Settings::default();
        settings.local.register_rule::<Noop>("noop");
        assert!(settings.env(None).registry().contains("noop"));
    }
}
