pub mod builder;
pub mod course_graph;
pub mod edge;
pub mod error;
pub mod node;

pub use builder::{
    graph_from_canvas, graph_from_canvas_api, graph_from_documents, graph_from_loader,
    graph_from_piazza,
};
pub use course_graph::{CourseGraph, GraphSnapshot};
pub use edge::Relationship;
pub use error::GraphError;
pub use node::ArtifactNode;
