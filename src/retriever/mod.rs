mod graph;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::graph::GraphError;

pub use graph::GraphRetriever;

/// Construction parameters for retrievers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Default number of edge hops followed from the seed artifact
    pub max_depth: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { max_depth: 1 }
    }
}

/// Query-driven document retrieval for an answer-generation layer
///
/// How a query is interpreted is up to the implementation; the graph
/// retriever treats it as a seed artifact ID.
pub trait Retriever {
    fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, GraphError>;
}
