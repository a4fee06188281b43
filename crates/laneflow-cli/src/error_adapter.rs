//! Adapts CLI errors into independently renderable miette diagnostics.
//!
//! A validation failure carries one violation per field path; each becomes
//! its own diagnostic so the user sees every problem in one run instead of
//! fixing them one at a time.

use miette::Diagnostic;
use thiserror::Error;

use laneflow_schema::SchemaError;

use crate::error::CliError;

/// One renderable diagnostic derived from a [`CliError`].
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct Reportable {
    message: String,
    #[help]
    help: Option<String>,
}

impl Reportable {
    fn new(message: impl Into<String>, help: Option<String>) -> Self {
        Self {
            message: message.into(),
            help,
        }
    }
}

/// Expands an error into the list of diagnostics to render.
pub fn to_reportables(err: &CliError) -> Vec<Reportable> {
    match err {
        CliError::Schema(SchemaError::Validation { violations }) => violations
            .iter()
            .map(|violation| {
                Reportable::new(
                    format!("validation failed at {violation}"),
                    Some("structural problems block saving; fix the document and retry".into()),
                )
            })
            .collect(),
        other => vec![Reportable::new(other.to_string(), None)],
    }
}
