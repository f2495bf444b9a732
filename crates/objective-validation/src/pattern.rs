//! # Text Pattern Validators
//!
//! [`Pattern`] checks text against a regular expression. [`Email`] checks
//! e-mail address syntax only: one `@` with a local part before it and a
//! dotted domain after it. Neither transforms the value. Non-text values
//! fail.

use regex::Regex;

use objective_core::{Environment, Invalid, Node, Validator, Value};

fn text<'a>(node: &Node, value: &'a Value) -> Result<&'a str, Invalid> {
    value.as_str().ok_or_else(|| {
        Invalid::bare(format!(
            "Expected text for `{}`, got {}",
            node.display_name(),
            value.type_name()
        ))
    })
}

/// Accepts text that matches a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Validator for Pattern {
    fn validate(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        let candidate = text(node, &value)?;
        if self.regex.is_match(candidate) {
            Ok(value)
        } else {
            let message = format!("'{candidate}' does not match pattern '{}'", self.regex.as_str());
            Err(Invalid::bare(message).with_value(value))
        }
    }
}

/// Accepts syntactically valid e-mail addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Email {
    pub fn is_valid(address: &str) -> bool {
        let Some((local, domain)) = address.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && !address.chars().any(char::is_whitespace)
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }
}

impl Validator for Email {
    fn validate(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        let candidate = text(node, &value)?;
        if Self::is_valid(candidate) {
            Ok(value)
        } else {
            let message = format!("'{candidate}' is not a valid email address");
            Err(Invalid::bare(message).with_value(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objective_core::types;

    fn validate(validator: &dyn Validator, value: impl Into<Value>) -> Result<Value, Invalid> {
        let node = types::field().instantiate().unwrap();
        validator.validate(&node, value.into(), &Environment::default())
    }

    #[test]
    fn test_pattern() {
        let digits = Pattern::new(r"^\d+$").unwrap();
        assert_eq!(validate(&digits, "123").unwrap(), Value::from("123"));
        let err = validate(&digits, "12a").unwrap_err();
        assert_eq!(err.message(), r"'12a' does not match pattern '^\d+$'");
        let err = validate(&digits, 12).unwrap_err();
        assert_eq!(err.message(), "Expected text for `Field`, got int");
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    fn test_email_syntax() {
        for good in ["foo@example.com", "a.b+c@sub.example.org"] {
            assert!(Email::is_valid(good), "{good}");
        }
        for bad in ["", "foo", "@example.com", "foo@", "foo@bar", "foo@.com", "foo@com.", "a b@c.d", "a@b@c.d"] {
            assert!(!Email::is_valid(bad), "{bad}");
        }
        let err = validate(&Email, "nope").unwrap_err();
        assert_eq!(err.message(), "'nope' is not a valid email address");
    }
}
