use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Artifact ID '{0}' not found in graph")]
    ArtifactNotFound(String),
}
