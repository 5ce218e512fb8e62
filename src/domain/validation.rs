//! Command validation
//!
//! Request payloads declare their field rules with `validator`. The
//! [`CommandValidator`] adapter runs those rules plus any rule that needs
//! runtime context, and reports everything as one camelCase field map.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

/// Field-level validation failures, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Ok when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// `initial_balance` -> `initialBalance`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = ValidationErrors::new();
        for (field, failures) in errors.field_errors() {
            if let Some(failure) = failures.first() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                fields.add(&wire_name(&field.to_string()), message);
            }
        }
        fields
    }
}

/// Converts an unchecked payload into a well-typed command.
///
/// `check` holds rules that depend on runtime configuration; its failures
/// land in the same field map as the declared ones.
pub trait CommandValidator: Validate + Sized {
    type Context;
    type Validated;

    fn check(&self, _context: &Self::Context, _errors: &mut ValidationErrors) {}

    /// Build the command once every rule has passed
    fn build(self) -> Result<Self::Validated, ValidationErrors>;

    fn into_command(self, context: &Self::Context) -> Result<Self::Validated, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(declared) => ValidationErrors::from(declared),
        };
        self.check(context, &mut errors);
        errors.into_result()?;
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Profile {
        #[validate(length(min = 3, message = "too short"))]
        display_name: String,
        #[validate(length(min = 1))]
        code: String,
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("login", "must not be blank");
        errors.add("login", "something else");
        errors.add("amount", "must be at least 1");

        assert_eq!(errors.fields().len(), 2);
        assert_eq!(errors.fields()["login"], "must not be blank");
        assert_eq!(
            errors.to_string(),
            "amount: must be at least 1; login: must not be blank"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("password", "too short");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("initial_balance"), "initialBalance");
        assert_eq!(wire_name("full_name"), "fullName");
        assert_eq!(wire_name("amount"), "amount");
    }

    #[test]
    fn test_declared_errors_use_wire_names() {
        let declared = Profile {
            display_name: "ab".to_string(),
            code: String::new(),
        }
        .validate()
        .unwrap_err();

        let errors = ValidationErrors::from(declared);
        assert_eq!(errors.fields()["displayName"], "too short");
        // No message configured: the rule code is reported
        assert_eq!(errors.fields()["code"], "length");
    }
}
