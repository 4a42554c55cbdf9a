pub mod config;
pub mod document;
pub mod graph;
pub mod loader;
pub mod retriever;
pub mod text;

pub use config::Config;
pub use document::Document;
pub use graph::{
    graph_from_canvas, graph_from_canvas_api, graph_from_documents, graph_from_piazza,
    CourseGraph, GraphError,
};
pub use loader::{CanvasApiLoader, CanvasLoader, DocumentLoader, LoaderError, PiazzaLoader};
pub use retriever::{GraphRetriever, Retriever, RetrieverConfig};
