use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::{Document, COURSE_KEY, SOURCE_KEY, TIMESTAMP_KEY};
use crate::loader::{archive, archive::ExtractedFile, DocumentLoader, LoaderError};

/// Loads the JSON and CSV files of a zipped Piazza export
#[derive(Debug, Clone)]
pub struct PiazzaLoader {
    path: PathBuf,
    course: String,
}

impl PiazzaLoader {
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

    fn base_document(&self, file: &ExtractedFile, content: String) -> Document {
        Document::new(content)
            .with_metadata(SOURCE_KEY, file.source())
            .with_metadata(COURSE_KEY, self.course.as_str())
            .with_metadata(TIMESTAMP_KEY, file.timestamp.as_str())
    }

    fn load_json(&self, file: &ExtractedFile) -> Result<Vec<Document>, LoaderError> {
        let raw = fs::read_to_string(&file.path)?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| LoaderError::Json {
                path: file.source(),
                source,
            })?;
        Ok(vec![self.base_document(file, value.to_string())])
    }

    fn load_csv(&self, file: &ExtractedFile) -> Result<Vec<Document>, LoaderError> {
        let raw = fs::read_to_string(&file.path)?;
        let mut records = parse_csv(&raw).into_iter();
        let Some(headers) = records.next() else {
            return Ok(Vec::new());
        };

        Ok(records
            .enumerate()
            .map(|(row, record)| {
                let content = headers
                    .iter()
                    .zip(record.iter().chain(std::iter::repeat(&String::new())))
                    .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.base_document(file, content).with_metadata("row", row)
            })
            .collect())
    }
}

#[async_trait]
impl DocumentLoader for PiazzaLoader {
    async fn load(&self) -> Result<Vec<Document>, LoaderError> {
        let extracted = archive::extract(&self.path)?;
        let mut documents = Vec::new();

        for file in extracted.files() {
            match file.extension().as_str() {
                ".json" => documents.extend(self.load_json(file)?),
                ".csv" => documents.extend(self.load_csv(file)?),
                _ => debug!(file = %file.source(), "skipping non-data file"),
            }
        }

        info!(
            course = %self.course,
            documents = documents.len(),
            "loaded Piazza export"
        );
        Ok(documents)
    }
}

/// Split CSV text into records, honouring double-quoted fields
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
        .into_iter()
        .filter(|r| !(r.len() == 1 && r[0].is_empty()))
        .collect()
}
