//! Request validation primitives shared by every endpoint schema.
//!
//! A schema never applies part of its input: it returns either the fully
//! normalized value or every `(field, message)` pair that failed.

pub mod rules;

use serde::Serialize;
use thiserror::Error;

/// One failed constraint, rendered into the `details` list of the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Gather the failures of each checked field, in declaration order.
    pub fn collect<I>(checks: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<FieldError>>>,
    {
        Self {
            errors: checks.into_iter().flatten().flatten().collect(),
        }
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_fields(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Attach a field name to the messages a rule produced.
pub fn field<T>(name: &'static str, result: rules::RuleResult<T>) -> Result<T, Vec<FieldError>> {
    result.map_err(|messages| {
        messages
            .into_iter()
            .map(|message| FieldError::new(name, message))
            .collect()
    })
}
