use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::document::Document;
use crate::graph::{CourseGraph, GraphError};
use crate::retriever::{Retriever, RetrieverConfig};

/// Breadth-first retrieval over a [`CourseGraph`]
///
/// Borrows the graph for its whole lifetime and never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct GraphRetriever<'g> {
    graph: &'g CourseGraph,
    max_depth: usize,
}

impl<'g> GraphRetriever<'g> {
    pub fn new(graph: &'g CourseGraph, max_depth: usize) -> Self {
        Self { graph, max_depth }
    }

    pub fn with_config(graph: &'g CourseGraph, config: &RetrieverConfig) -> Self {
        Self::new(graph, config.max_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Documents reachable from `artifact_id` within `max_depth` hops
    ///
    /// The seed itself is excluded. Results are in breadth-first discovery
    /// order and each artifact appears at most once, even on cyclic graphs.
    pub fn retrieve(
        &self,
        artifact_id: &str,
        max_depth: Option<usize>,
    ) -> Result<Vec<&'g Document>, GraphError> {
        if !self.graph.contains(artifact_id) {
            return Err(GraphError::ArtifactNotFound(artifact_id.to_string()));
        }
        let depth = max_depth.unwrap_or(self.max_depth);

        let graph: &'g CourseGraph = self.graph;
        let mut visited: HashSet<&str> = HashSet::from([artifact_id]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(artifact_id, 0)]);
        let mut docs = Vec::new();

        while let Some((node, d)) = queue.pop_front() {
            if d >= depth {
                continue;
            }
            for neighbor in graph.neighbor_ids(node)? {
                if !visited.insert(neighbor) {
                    continue;
                }
                queue.push_back((neighbor, d + 1));
                if let Some(doc) = graph.get(neighbor) {
                    docs.push(doc);
                }
            }
        }

        debug!(seed = artifact_id, depth, found = docs.len(), "graph retrieval");
        Ok(docs)
    }
}

impl Retriever for GraphRetriever<'_> {
    fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, GraphError> {
        Ok(self
            .retrieve(query, None)?
            .into_iter()
            .cloned()
            .collect())
    }
}
