use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::{Document, COURSE_KEY, SOURCE_KEY, TIMESTAMP_KEY};
use crate::loader::{archive, DocumentLoader, LoaderError};
use crate::text::{html_to_text, markdown_to_text};

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp"];

/// Formats that need an external document parser to yield text
const UNPARSED_EXTENSIONS: &[&str] = &[".ppt", ".pptx", ".pdf", ".doc", ".docx", ".xls", ".xlsx"];

/// Loads every readable file of a zipped Canvas `.imscc` export
#[derive(Debug, Clone)]
pub struct CanvasLoader {
    path: PathBuf,
    course: String,
}

impl CanvasLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_owned()));
        }
        let course = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_owned(),
            course,
        })
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    fn is_skipped(extension: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&extension) || UNPARSED_EXTENSIONS.contains(&extension)
    }

    fn read_text(path: &Path, extension: &str) -> Result<String, LoaderError> {
        let raw = fs::read(path)?;
        let text = String::from_utf8_lossy(&raw);
        Ok(match extension {
            ".html" | ".htm" | ".xml" => html_to_text(&text),
            ".md" | ".markdown" => markdown_to_text(&text),
            _ => text.into_owned(),
        })
    }
}

#[async_trait]
impl DocumentLoader for CanvasLoader {
    async fn load(&self) -> Result<Vec<Document>, LoaderError> {
        let extracted = archive::extract(&self.path)?;
        let mut documents = Vec::new();

        for file in extracted.files() {
            let extension = file.extension();
            if Self::is_skipped(&extension) {
                debug!(file = %file.source(), "skipping unsupported file");
                continue;
            }

            let content = Self::read_text(&file.path, &extension)?;
            documents.push(
                Document::new(content)
                    .with_metadata(SOURCE_KEY, file.source())
                    .with_metadata(COURSE_KEY, self.course.as_str())
                    .with_metadata(TIMESTAMP_KEY, file.timestamp.as_str()),
            );
        }

        info!(
            course = %self.course,
            documents = documents.len(),
            "loaded Canvas export"
        );
        Ok(documents)
    }
}
