use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A node in the course graph: one artifact and the document it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNode {
    /// Identifier, unique within a graph
    pub id: String,
    pub document: Document,
}

impl ArtifactNode {
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }
}
