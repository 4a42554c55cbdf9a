use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata key holding the origin path or URL of a document
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding the ISO-8601 timestamp of a document
pub const TIMESTAMP_KEY: &str = "timestamp";
/// Metadata key holding the course identifier
pub const COURSE_KEY: &str = "course";

pub type Metadata = BTreeMap<String, Value>;

/// A normalized piece of course content produced by a loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text body
    pub content: String,
    /// Free-form metadata, passed through untouched by the graph
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document without metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Builder-style metadata insertion
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Origin path or URL, if present and a string
    pub fn source(&self) -> Option<&str> {
        self.str_field(SOURCE_KEY)
    }

    /// ISO-8601 timestamp, if present and a string
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field(TIMESTAMP_KEY)
    }

    /// Course identifier, if present and a string
    pub fn course(&self) -> Option<&str> {
        self.str_field(COURSE_KEY)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}
