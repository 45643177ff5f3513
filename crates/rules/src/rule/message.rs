//! Labels, message templates and placeholder substitution
//!
//! Templates contain `:name` placeholders. `:attribute` is always available
//! and resolves to the field label; rules add their own (`:min`, `:other`,
//! ...). Unknown placeholders are left untouched.
//!
//! Template lookup for error `code` on `field`, first match wins:
//!
//! 1. instance messages keyed `field.code`, then `code`
//! 2. messages of enclosing runners, innermost first, with the same keys
//! 3. global messages (from the injected [`RuleSet`]) with the same keys
//! 4. the template the rule itself supplied
//!
//! Labels and transformers fall back to enclosing runners the same way.
//!
//! Negated clauses look up `!code` instead of `code`, since the two
//! directions say opposite things.

use crate::registry::RuleSet;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
});

/// Callable applied to a placeholder value before it is substituted.
pub type AttributeTransformer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Per-validator label, message and transformer overrides.
#[derive(Clone, Default)]
pub struct Messages {
    labels: HashMap<String, String>,
    templates: HashMap<String, String>,
    transformers: HashMap<String, HashMap<String, AttributeTransformer>>,
}

impl Messages {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display label of a field.
    pub fn set_label(&mut self, field: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(field.into(), label.into());
    }

    /// Sets a message template for `field.code`, `code`, `field.!code` or `!code`.
    pub fn set_message(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Registers a transformer for one placeholder.
    ///
    /// `key` is `field.code`, `code` or `field`; lookups try them in that order.
    pub fn set_transformer(
        &mut self,
        key: impl Into<String>,
        placeholder: impl Into<String>,
        transformer: AttributeTransformer,
    ) {
        self.transformers
            .entry(key.into())
            .or_default()
            .insert(placeholder.into(), transformer);
    }

    /// Returns the label of a field: the override, or the key with
    /// underscores turned into spaces.
    #[must_use]
    pub fn label<'a>(&'a self, field: &'a str) -> Cow<'a, str> {
        match self.labels.get(field) {
            Some(label) => Cow::Borrowed(label),
            None => humanize(field),
        }
    }

    pub(crate) fn label_override(&self, field: &str) -> Option<&str> {
        self.labels.get(field).map(String::as_str)
    }

    pub(crate) fn template(&self, field: &str, code: &str, negated: bool) -> Option<&str> {
        template_keys(field, code, negated)
            .iter()
            .find_map(|key| self.templates.get(key))
            .map(String::as_str)
    }

    pub(crate) fn transformer(
        &self,
        field: &str,
        code: &str,
        placeholder: &str,
    ) -> Option<&AttributeTransformer> {
        [format!("{field}.{code}"), code.to_owned(), field.to_owned()]
            .iter()
            .find_map(|key| self.transformers.get(key)?.get(placeholder))
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("labels", &self.labels)
            .field("templates", &self.templates)
            .field(
                "transformers",
                &self.transformers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The two lookup keys for a code, most specific first.
pub(crate) fn template_keys(field: &str, code: &str, negated: bool) -> [String; 2] {
    let code = if negated {
        format!("!{code}")
    } else {
        code.to_owned()
    };
    [format!("{field}.{code}"), code]
}

/// Turns a field key into a readable label: `first_name` becomes `first name`.
#[must_use]
pub fn humanize(field: &str) -> Cow<'_, str> {
    if field.contains('_') {
        Cow::Owned(field.replace('_', " "))
    } else {
        Cow::Borrowed(field)
    }
}

/// Substitutes `:name` placeholders using `lookup`; unknown names stay as written.
///
/// # Examples
///
/// ```
/// use nebula_rules::rule::message::render;
///
/// let out = render("The :attribute must be at least :min.", |name| match name {
///     "attribute" => Some("age".to_owned()),
///     "min" => Some("18".to_owned()),
///     _ => None,
/// });
/// assert_eq!(out, "The age must be at least 18.");
/// ```
pub fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

/// Everything needed to render the messages of one rule invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageScope<'a> {
    messages: Option<&'a Messages>,
    global: Option<&'a RuleSet>,
    parent: Option<&'a MessageScope<'a>>,
}

impl<'a> MessageScope<'a> {
    /// Creates a scope over instance overrides and the global tier.
    pub fn new(messages: Option<&'a Messages>, global: Option<&'a RuleSet>) -> Self {
        Self {
            messages,
            global,
            parent: None,
        }
    }

    /// Falls back to `parent` for labels, templates and transformers this
    /// scope does not override.
    #[must_use]
    pub fn with_parent(mut self, parent: &'a MessageScope<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Label of a field.
    pub fn label(&self, field: &str) -> String {
        self.label_override(field)
            .map_or_else(|| humanize(field).into_owned(), str::to_owned)
    }

    fn label_override(&self, field: &str) -> Option<&'a str> {
        self.messages
            .and_then(|messages| messages.label_override(field))
            .or_else(|| self.parent.and_then(|parent| parent.label_override(field)))
    }

    /// Resolves the template for a failure, falling back to `default`.
    pub fn template<'t>(
        &'t self,
        field: &str,
        code: &str,
        negated: bool,
        default: &'t str,
    ) -> &'t str {
        if let Some(template) = self.override_template(field, code, negated) {
            return template;
        }
        if let Some(global) = self.global {
            let keys = template_keys(field, code, negated);
            if let Some(template) = keys.iter().find_map(|key| global.message(key)) {
                return template;
            }
        }
        default
    }

    fn override_template(&self, field: &str, code: &str, negated: bool) -> Option<&'a str> {
        self.messages
            .and_then(|messages| messages.template(field, code, negated))
            .or_else(|| {
                self.parent
                    .and_then(|parent| parent.override_template(field, code, negated))
            })
    }

    /// Applies the transformer registered for a placeholder, if any.
    pub fn transform(&self, field: &str, code: &str, placeholder: &str, value: String) -> String {
        match self.transformer(field, code, placeholder) {
            Some(transformer) => transformer(&value),
            None => value,
        }
    }

    fn transformer(
        &self,
        field: &str,
        code: &str,
        placeholder: &str,
    ) -> Option<&'a AttributeTransformer> {
        self.messages
            .and_then(|messages| messages.transformer(field, code, placeholder))
            .or_else(|| {
                self.parent
                    .and_then(|parent| parent.transformer(field, code, placeholder))
            })
    }
}
