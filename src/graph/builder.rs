use anyhow::Result;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::config::CanvasApiConfig;
use crate::document::Document;
use crate::graph::CourseGraph;
use crate::loader::{CanvasApiLoader, CanvasLoader, DocumentLoader, PiazzaLoader};

pub const CANVAS_PREFIX: &str = "canvas";
pub const PIAZZA_PREFIX: &str = "piazza";

/// Build a course graph from a flat sequence of documents
///
/// Each document becomes the node `"{prefix}_{position}"`. Documents are
/// grouped by the parent directory of their `source` metadata and every group
/// is chained in ascending `timestamp` order, so a group of N documents yields
/// N - 1 edges. Groups are never linked to each other.
pub fn graph_from_documents<I>(documents: I, prefix: &str) -> CourseGraph
where
    I: IntoIterator<Item = Document>,
{
    let mut graph = CourseGraph::new();
    let nodes: Vec<NodeIndex> = documents
        .into_iter()
        .enumerate()
        .map(|(idx, doc)| graph.upsert(format!("{}_{}", prefix, idx), doc))
        .collect();

    for (dir, mut members) in group_by_parent(&graph, nodes) {
        members.sort_by_key(|&idx| graph.document_at(idx).timestamp().unwrap_or(""));
        debug!(group = %dir.display(), members = members.len(), "linking group");
        for pair in members.windows(2) {
            graph.link(pair[0], pair[1]);
        }
    }

    info!(
        prefix,
        nodes = graph.len(),
        edges = graph.edge_count(),
        "built course graph"
    );
    graph
}

/// Load documents with `loader` and build a graph with the given ID prefix
pub async fn graph_from_loader(loader: &dyn DocumentLoader, prefix: &str) -> Result<CourseGraph> {
    let documents = loader.load().await?;
    Ok(graph_from_documents(documents, prefix))
}

/// Build a graph from a Canvas `.imscc` export
pub async fn graph_from_canvas<P: AsRef<Path>>(canvas_path: P) -> Result<CourseGraph> {
    let loader = CanvasLoader::new(canvas_path)?;
    graph_from_loader(&loader, CANVAS_PREFIX).await
}

/// Build a graph from a Piazza `.zip` export
pub async fn graph_from_piazza<P: AsRef<Path>>(piazza_path: P) -> Result<CourseGraph> {
    let loader = PiazzaLoader::new(piazza_path)?;
    graph_from_loader(&loader, PIAZZA_PREFIX).await
}

/// Build a graph from a live Canvas course via the REST API
pub async fn graph_from_canvas_api(config: &CanvasApiConfig) -> Result<CourseGraph> {
    let loader = CanvasApiLoader::new(config)?;
    graph_from_loader(&loader, CANVAS_PREFIX).await
}

/// Parent directory of a document's source; documents without one share `"."`
///
/// A leading `./` is ignored, and a bare root such as `/` is its own group.
fn group_key(doc: &Document) -> PathBuf {
    let source = Path::new(doc.source().unwrap_or("."));
    let Some(parent) = source.parent() else {
        return if source.has_root() {
            source.components().take(1).collect()
        } else {
            PathBuf::from(".")
        };
    };

    let key: PathBuf = parent
        .components()
        .skip_while(|c| matches!(c, Component::CurDir))
        .collect();
    if key.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        key
    }
}

/// Partition nodes by group key, keeping groups in order of first appearance
fn group_by_parent(
    graph: &CourseGraph,
    nodes: Vec<NodeIndex>,
) -> Vec<(PathBuf, Vec<NodeIndex>)> {
    let mut groups: Vec<(PathBuf, Vec<NodeIndex>)> = Vec::new();
    let mut positions: HashMap<PathBuf, usize> = HashMap::new();

    for node in nodes {
        let key = group_key(graph.document_at(node));
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(node),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![node]));
            }
        }
    }

    groups
}
