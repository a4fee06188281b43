//! Document persistence behind an explicit trait.
//!
//! The store is the single gate through which documents are written. Every
//! save validates first; a document that fails validation is never
//! persisted and the previously stored state stays untouched. Callers
//! receive the store as an explicit handle; nothing in the engine reaches
//! for ambient storage.

use std::collections::HashMap;

use log::info;

use laneflow_schema::schema::Document;
use laneflow_schema::validate::{self, ValidationReport};

use crate::error::LaneflowError;

/// Validated document storage, keyed by project id.
pub trait DocumentStore {
    /// Loads the document for a project.
    ///
    /// # Errors
    ///
    /// Returns [`LaneflowError::DocumentNotFound`] for unknown projects.
    fn load(&self, project_id: &str) -> Result<Document, LaneflowError>;

    /// Validates and persists a document.
    ///
    /// # Errors
    ///
    /// Returns the validation failure verbatim; the prior persisted state is
    /// left untouched in that case.
    fn save(&mut self, project_id: &str, document: &Document)
    -> Result<ValidationReport, LaneflowError>;
}

/// In-memory store, used by tests and as the session-local cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.documents.contains_key(project_id)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, project_id: &str) -> Result<Document, LaneflowError> {
        self.documents
            .get(project_id)
            .cloned()
            .ok_or_else(|| LaneflowError::DocumentNotFound {
                project_id: project_id.to_owned(),
            })
    }

    fn save(
        &mut self,
        project_id: &str,
        document: &Document,
    ) -> Result<ValidationReport, LaneflowError> {
        let report = validate::validate(document)?;
        self.documents
            .insert(project_id.to_owned(), document.clone());
        info!(project_id, warnings = report.warnings().len(); "Document saved");
        Ok(report)
    }
}
