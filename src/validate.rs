//! Declarative field-rule validation for incoming requests.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::{DirectoryError, Result};

// One '@', not first, not last.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+$").expect("email pattern compiles"));

/// A single constraint applied to one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and not blank.
    Required,
    /// Value, when present, must look like an email address.
    Email,
}

impl Rule {
    /// Returns true when `value` satisfies this rule.
    pub fn check(self, value: Option<&str>) -> bool {
        match self {
            Rule::Required => value.is_some_and(|v| !v.trim().is_empty()),
            Rule::Email => value.is_none_or(|v| EMAIL_RE.is_match(v)),
        }
    }
}

/// A declared rule bound to a field value and its failure message.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<'a> {
    /// Field name, for logging.
    pub field: &'static str,
    /// Current value of the field.
    pub value: Option<&'a str>,
    /// Constraint to apply.
    pub rule: Rule,
    /// Message reported when the constraint fails.
    pub message: &'static str,
}

impl<'a> FieldRule<'a> {
    /// Declares `rule` on `field` with the given failure `message`.
    pub fn new(field: &'static str, value: Option<&'a str>, rule: Rule, message: &'static str) -> Self {
        Self {
            field,
            value,
            rule,
            message,
        }
    }
}

/// Request types that declare field rules.
pub trait Validate {
    /// Declared rules, in evaluation order.
    fn rules(&self) -> Vec<FieldRule<'_>>;
}

/// Runs every declared rule; the first failure aborts with its message.
pub fn validate<T: Validate + ?Sized>(request: &T) -> Result<()> {
    for rule in request.rules() {
        if !rule.rule.check(rule.value) {
            tracing::debug!(field = rule.field, rule = ?rule.rule, "validation failed");
            return Err(DirectoryError::ValidationFailed(rule.message.to_string()));
        }
    }
    Ok(())
}

/// Checks that an id was supplied and is not the nil UUID.
pub fn validate_id(id: Option<Uuid>) -> Result<Uuid> {
    let id = id.ok_or(DirectoryError::MissingArgument("id"))?;
    if id.is_nil() {
        return Err(DirectoryError::InvalidArgument("id cannot be the nil uuid"));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Signup {
        name: String,
        email: Option<String>,
    }

    impl Validate for Signup {
        fn rules(&self) -> Vec<FieldRule<'_>> {
            vec![
                FieldRule::new("name", Some(&self.name), Rule::Required, "name missing"),
                FieldRule::new("email", self.email.as_deref(), Rule::Email, "email bad"),
            ]
        }
    }

    #[test]
    fn required_rejects_blank_values() {
        assert!(!Rule::Required.check(None));
        assert!(!Rule::Required.check(Some("")));
        assert!(!Rule::Required.check(Some("   ")));
        assert!(Rule::Required.check(Some("x")));
    }

    #[test]
    fn email_rule_wants_single_inner_at() {
        assert!(Rule::Email.check(None));
        assert!(Rule::Email.check(Some("jane@x.com")));
        assert!(!Rule::Email.check(Some("jane.x.com")));
        assert!(!Rule::Email.check(Some("@x.com")));
        assert!(!Rule::Email.check(Some("jane@")));
        assert!(!Rule::Email.check(Some("a@b@c")));
    }

    #[test]
    fn first_failing_rule_wins() {
        let req = Signup {
            name: String::new(),
            email: Some("nope".into()),
        };
        assert_eq!(
            validate(&req),
            Err(DirectoryError::ValidationFailed("name missing".into()))
        );

        let req = Signup {
            name: "Jane".into(),
            email: Some("nope".into()),
        };
        assert_eq!(
            validate(&req),
            Err(DirectoryError::ValidationFailed("email bad".into()))
        );
    }

    #[test]
    fn validate_id_distinguishes_missing_and_nil() {
        assert_eq!(validate_id(None), Err(DirectoryError::MissingArgument("id")));
        assert!(matches!(
            validate_id(Some(Uuid::nil())),
            Err(DirectoryError::InvalidArgument(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(validate_id(Some(id)), Ok(id));
    }
}
