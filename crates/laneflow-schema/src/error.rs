//! Error types for document loading, validation, and saving.

use std::fmt;

use thiserror::Error;

/// A single validation failure, addressed by field path.
///
/// Paths use dotted/bracketed notation into the wire format, e.g.
/// `process_graphs.pg_main.nodes[3].lane_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    path: String,
    message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The main error type for document operations.
///
/// `Validation` carries the full list of field-path violations; a save that
/// fails validation is aborted and the prior persisted state stays
/// untouched.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", format_violations(violations))]
    Validation { violations: Vec<Violation> },
}

impl SchemaError {
    /// Create a validation error from collected violations.
    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation { violations }
    }

    /// The violations of a `Validation` error, empty for other variants.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    match violations.first() {
        Some(first) if violations.len() == 1 => first.to_string(),
        Some(first) => format!("{} (+{} more)", first, violations.len() - 1),
        None => "document failed validation".to_owned(),
    }
}
