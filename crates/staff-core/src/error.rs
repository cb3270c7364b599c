//! Core error types for Staffing RS
//!
//! Every layer converts its failures into [`StaffError`] before they reach the
//! HTTP boundary, where the variant decides the status code.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all staffing operations
#[derive(Error, Debug)]
pub enum StaffError {
    #[error("{entity} not found: {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StaffError {
    /// Entity lookup by id failed
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        StaffError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Single base validation message
    pub fn validation(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        StaffError::Validation(errors)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StaffError::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        StaffError::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        StaffError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            StaffError::NotFound { .. } => 404,
            StaffError::Unauthorized { .. } => 401,
            StaffError::Forbidden { .. } => 403,
            StaffError::Validation(_) => 400,
            StaffError::Conflict { .. } => 409,
            StaffError::Database(_) | StaffError::Internal(_) | StaffError::Config(_) => 500,
        }
    }
}

/// Validation errors collection
///
/// Field errors are keyed by attribute name; base errors are messages that are
/// not tied to a single attribute (for example a malformed date parameter).
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("{}", self.full_messages().join(", "))]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Base messages verbatim, field messages prefixed with the field name
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
