//! Error type for the CLI layer.

use thiserror::Error;

use laneflow_schema::SchemaError;

/// Everything that can go wrong while normalizing a document from the
/// command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to encode output document: {0}")]
    Encode(#[from] serde_json::Error),
}
