use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
    Direction,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::document::Document;
use crate::graph::{edge::Relationship, error::GraphError, node::ArtifactNode};

/// Directed graph of course artifacts
///
/// Nodes own one [`Document`] each and are addressed by string identifiers.
/// Edges are additive and unique per ordered pair; both endpoints must exist
/// when an edge is added.
#[derive(Debug, Clone)]
pub struct CourseGraph {
    /// The underlying graph structure
    graph: DiGraph<ArtifactNode, ()>,
    /// Mapping from artifact ID to node index for quick lookups
    node_map: HashMap<String, NodeIndex>,
}

/// Serializable, order-preserving view of a [`CourseGraph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<ArtifactNode>,
    pub edges: Vec<Relationship>,
}

impl Default for CourseGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseGraph {
    /// Create a new empty course graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Insert a document at `artifact_id`, replacing any document already there
    pub fn add_artifact(&mut self, artifact_id: impl Into<String>, document: Document) {
        self.upsert(artifact_id.into(), document);
    }

    pub(crate) fn upsert(&mut self, artifact_id: String, document: Document) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&artifact_id) {
            self.graph[idx].document = document;
            return idx;
        }

        let idx = self
            .graph
            .add_node(ArtifactNode::new(artifact_id.clone(), document));
        self.node_map.insert(artifact_id, idx);
        idx
    }

    /// Edge between two nodes of this graph
    pub(crate) fn link(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.update_edge(from, to, ());
    }

    pub(crate) fn document_at(&self, idx: NodeIndex) -> &Document {
        &self.graph[idx].document
    }

    /// Add a directed edge between two existing artifacts
    ///
    /// Adding an edge that already exists is a no-op.
    pub fn add_relationship(&mut self, source_id: &str, target_id: &str) -> Result<(), GraphError> {
        let from_idx = self.index_of(source_id)?;
        let to_idx = self.index_of(target_id)?;

        self.link(from_idx, to_idx);
        Ok(())
    }

    /// Documents of all artifacts with an edge from `artifact_id`, in edge insertion order
    pub fn neighbors(&self, artifact_id: &str) -> Result<Vec<&Document>, GraphError> {
        let idx = self.index_of(artifact_id)?;
        Ok(self
            .outgoing(idx)
            .into_iter()
            .map(|target| &self.graph[target].document)
            .collect())
    }

    /// Identifiers of all artifacts with an edge from `artifact_id`, in edge insertion order
    pub fn neighbor_ids(&self, artifact_id: &str) -> Result<Vec<&str>, GraphError> {
        let idx = self.index_of(artifact_id)?;
        Ok(self
            .outgoing(idx)
            .into_iter()
            .map(|target| self.graph[target].id.as_str())
            .collect())
    }

    /// Get the document stored at `artifact_id`
    pub fn get(&self, artifact_id: &str) -> Option<&Document> {
        self.node_map
            .get(artifact_id)
            .map(|idx| &self.graph[*idx].document)
    }

    pub fn contains(&self, artifact_id: &str) -> bool {
        self.node_map.contains_key(artifact_id)
    }

    pub fn has_edge(&self, source_id: &str, target_id: &str) -> bool {
        match (self.node_map.get(source_id), self.node_map.get(target_id)) {
            (Some(from), Some(to)) => self.graph.find_edge(*from, *to).is_some(),
            _ => false,
        }
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Artifact identifiers in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| self.graph[idx].id.as_str())
    }

    /// All artifacts in insertion order
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactNode> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.graph.edge_references().map(move |edge| {
            Relationship::new(
                self.graph[edge.source()].id.clone(),
                self.graph[edge.target()].id.clone(),
            )
        })
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.artifacts().cloned().collect(),
            edges: self.edges().collect(),
        }
    }

    /// Rebuild a graph from a snapshot, validating every edge endpoint
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in snapshot.nodes {
            graph.add_artifact(node.id, node.document);
        }
        for edge in &snapshot.edges {
            graph.add_relationship(&edge.source, &edge.target)?;
        }
        Ok(graph)
    }

    fn index_of(&self, artifact_id: &str) -> Result<NodeIndex, GraphError> {
        self.node_map
            .get(artifact_id)
            .copied()
            .ok_or_else(|| GraphError::ArtifactNotFound(artifact_id.to_string()))
    }

    // petgraph walks adjacency lists newest-first; edge indices restore insertion order.
    fn outgoing(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }
}
