//! Pattern rules
//!
//! Patterns match against the text form of scalars; null, collections and
//! files never match.

use crate::foundation::{RuleError, RuleResult};
use crate::rule::{Rule, RuleCall, RuleContext, required_text};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

const FLAGS: &str = "imsxu";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

// ============================================================================
// REGEX
// ============================================================================

/// `regex:pattern` or `regex:/pattern/flags`.
///
/// Supported flags are `i`, `m`, `s`, `x` and `u` (ignored; matching is
/// always Unicode-aware). A leading `/` only opens a delimited pattern when
/// everything after the last `/` is a flag letter, so `/api/v1` is a plain
/// pattern. Since `|` separates clauses, patterns containing it
/// must come from a `#config` key or an `@field` reference.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    regex: Option<Regex>,
}

impl Pattern {
    /// Compiles `raw`, honoring `/.../flags` delimiters when present.
    fn compile(rule: &str, raw: &str) -> RuleResult<Regex> {
        let invalid = |reason: String| RuleError::InvalidPattern {
            rule: rule.to_owned(),
            pattern: raw.to_owned(),
            reason,
        };

        let (source, flags) = match raw.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
            Some((source, flags)) if flags.chars().all(|flag| FLAGS.contains(flag)) => {
                (source, flags)
            }
            _ => (raw, ""),
        };

        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                _ => &mut builder,
            };
        }
        builder.build().map_err(|err| invalid(err.to_string()))
    }
}

impl Rule for Pattern {
    fn hydrate(&mut self, call: &RuleCall<'_>) -> RuleResult<()> {
        let raw = required_text(call)?;
        self.regex = Some(Self::compile(call.name, &raw)?);
        Ok(())
    }

    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = match (&self.regex, cx.value().to_text()) {
            (Some(regex), Some(text)) => regex.is_match(&text),
            _ => false,
        };
        cx.expect(
            holds,
            "The :attribute format is invalid.",
            "The :attribute format must not match.",
        );
    }
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

fn all_chars(cx: &RuleContext<'_>, test: impl Fn(char) -> bool) -> bool {
    cx.value()
        .to_text()
        .is_some_and(|text| !text.is_empty() && text.chars().all(test))
}

/// `alpha`: only alphabetic characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alpha;

impl Rule for Alpha {
    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = all_chars(cx, char::is_alphabetic);
        cx.expect(
            holds,
            "The :attribute may only contain letters.",
            "The :attribute must not contain only letters.",
        );
    }
}

/// `alpha_num`: only alphabetic characters and digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaNum;

impl Rule for AlphaNum {
    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = all_chars(cx, char::is_alphanumeric);
        cx.expect(
            holds,
            "The :attribute may only contain letters and numbers.",
            "The :attribute must not contain only letters and numbers.",
        );
    }
}

/// `email`: a syntactically valid address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Rule for Email {
    fn execute(&self, cx: &mut RuleContext<'_>) {
        let holds = cx
            .value()
            .as_str()
            .is_some_and(|text| EMAIL_REGEX.is_match(text));
        cx.expect(
            holds,
            "The :attribute must be a valid email address.",
            "The :attribute must not be an email address.",
        );
    }
}
