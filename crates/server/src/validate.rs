//! Declarative form validation.
//!
//! Each write endpoint declares a [`RuleSet`]: an ordered list of
//! (field, message, rule) entries evaluated by one generic evaluator over
//! the submitted field map. Every violated rule produces one
//! [`FieldError`]; an empty result means the submission is valid. Rules for
//! one field accumulate independently, so a field can emit several entries.
//!
//! Messages are the caller's user-facing strings; the engine never invents
//! wording.

use crate::models::FieldError;
use crate::services::auth;

/// A single validation rule kind.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be non-empty after trimming.
    Required,
    /// Value must be a well-formed URL. Scheme-less hosts
    /// (`www.example.com`) are accepted.
    Url,
    /// Value must be a well-formed email address.
    Email,
    /// Value must parse as an integer.
    Int,
    /// Value must parse as an integer within the inclusive range.
    IntRange(i64, i64),
    /// Value length (in characters) must lie within the inclusive range.
    Len(usize, usize),
    /// Value must equal another submitted field byte-for-byte.
    EqualsField(&'static str),
    /// Value must match a stored argon2 hash (old-password check).
    MatchesHash(String),
}

/// When a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// Always evaluated.
    Always,
    /// Evaluated only when the field arrived non-empty. A whitespace-only
    /// value counts as present, so it still has to satisfy the rule.
    IfPresent,
}

#[derive(Debug, Clone)]
struct FieldRule {
    field: &'static str,
    message: &'static str,
    rule: Rule,
    presence: Presence,
}

/// An ordered, declarative set of validation rules for one endpoint.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule that is always evaluated.
    #[must_use]
    pub fn rule(mut self, field: &'static str, message: &'static str, rule: Rule) -> Self {
        self.rules.push(FieldRule {
            field,
            message,
            rule,
            presence: Presence::Always,
        });
        self
    }

    /// Add a rule evaluated only when the field is non-empty.
    #[must_use]
    pub fn rule_if_present(mut self, field: &'static str, message: &'static str, rule: Rule) -> Self {
        self.rules.push(FieldRule {
            field,
            message,
            rule,
            presence: Presence::IfPresent,
        });
        self
    }

    /// Evaluate the rule set over a submitted field map.
    ///
    /// Fields absent from the submission are treated as empty. Errors are
    /// returned in declaration order.
    #[must_use]
    pub fn validate(&self, submission: &[(&str, &str)]) -> Vec<FieldError> {
        let lookup = |name: &str| -> &str {
            submission
                .iter()
                .find(|(field, _)| *field == name)
                .map_or("", |(_, value)| *value)
        };

        let mut errors = Vec::new();
        for entry in &self.rules {
            let value = lookup(entry.field);

            if entry.presence == Presence::IfPresent && value.is_empty() {
                continue;
            }

            let ok = match &entry.rule {
                Rule::Required => !value.trim().is_empty(),
                Rule::Url => is_url(value),
                Rule::Email => quartier_core::Email::parse(value.trim()).is_ok(),
                Rule::Int => value.trim().parse::<i64>().is_ok(),
                Rule::IntRange(min, max) => value
                    .trim()
                    .parse::<i64>()
                    .is_ok_and(|n| n >= *min && n <= *max),
                Rule::Len(min, max) => {
                    let len = value.chars().count();
                    len >= *min && len <= *max
                }
                Rule::EqualsField(other) => value == lookup(other),
                Rule::MatchesHash(hash) => auth::verify_password(value, hash).is_ok(),
            };

            if !ok {
                errors.push(FieldError::new(entry.field, entry.message));
            }
        }
        errors
    }
}

/// Check that a value is a plausible absolute URL.
///
/// The original directory accepted scheme-less links (`www.example.com`),
/// so a missing scheme is retried with `http://`. The host must contain a
/// dot to rule out bare words.
fn is_url(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return false;
    }

    let parsed = match url::Url::parse(trimmed) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("http://{trimmed}")).ok()
        }
        Err(_) => None,
    };

    parsed
        .and_then(|u| u.host_str().map(str::to_owned))
        .is_some_and(|host| host.contains('.'))
}
