//! Field-level validation reports shared by the actor framework and the domain.
//!
//! Entities declare their constraints with `validator` derive attributes; the
//! resulting [`validator::ValidationErrors`] are flattened into a
//! [`ValidationReport`] so they can cross the actor boundary and be rendered
//! by whatever sits in front of the store.

use serde::Serialize;
use std::fmt;

/// A single violated rule on a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: None,
        }
    }
}

/// All violations found for one input.
///
/// `item` is set when the input was part of a batch and holds its position
/// in the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<usize>,
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self {
            item: None,
            violations,
        }
    }

    /// Tags the report with the batch position of the offending input.
    pub fn for_item(mut self, index: usize) -> Self {
        self.item = Some(index);
        self
    }

    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.violations.iter().map(|v| v.field.as_str()).collect();
        fields.dedup();
        fields
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.item {
            write!(f, "item {}: ", index)?;
        }
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{} ({})", v.field, v.code))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<validator::ValidationErrors> for ValidationReport {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldViolation {
                    message: err.message.as_ref().map(|m| m.to_string()),
                    ..FieldViolation::new(field.to_string(), err.code.to_string())
                })
            })
            .collect();
        // field_errors() is backed by a HashMap
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        Self::new(violations)
    }
}
