use serde::{Deserialize, Serialize};

/// A directed "precedes" relationship between two artifacts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// Source artifact ID
    pub source: String,
    /// Target artifact ID
    pub target: String,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}
