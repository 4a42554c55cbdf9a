//! Zip extraction shared by the export loaders.

use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::loader::error::LoaderError;

/// Timestamp layout used for document metadata
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A regular file extracted from an export archive
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Path inside the archive
    pub relative_path: PathBuf,
    /// Path of the extracted copy on disk
    pub path: PathBuf,
    /// ISO-8601 modification time
    pub timestamp: String,
}

impl ExtractedFile {
    /// Lowercased extension including the leading dot, or an empty string
    pub fn extension(&self) -> String {
        self.relative_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default()
    }

    /// Archive-relative path with forward slashes
    pub fn source(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }
}

/// An archive unpacked into a temporary directory
///
/// The directory and its contents are removed when this value is dropped.
pub struct ExtractedArchive {
    dir: TempDir,
    files: Vec<ExtractedFile>,
}

impl ExtractedArchive {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Regular files in archive order
    pub fn files(&self) -> &[ExtractedFile] {
        &self.files
    }
}

/// Extract every regular file of `zip_path` into a fresh temporary directory
///
/// Entries whose names would escape the target directory are skipped.
pub fn extract(zip_path: &Path) -> Result<ExtractedArchive, LoaderError> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    let dir = tempfile::tempdir()?;
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative_path) = entry.enclosed_name() else {
            warn!(name = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let relative_path = relative_path.to_path_buf();
        let path = dir.path().join(&relative_path);

        if entry.is_dir() {
            fs::create_dir_all(&path)?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&path)?;
        io::copy(&mut entry, &mut out)?;

        let timestamp = match entry.last_modified().and_then(format_zip_time) {
            Some(ts) => ts,
            None => file_timestamp(&path)?,
        };

        files.push(ExtractedFile {
            relative_path,
            path,
            timestamp,
        });
    }

    debug!(archive = %zip_path.display(), files = files.len(), "extracted archive");
    Ok(ExtractedArchive { dir, files })
}

fn format_zip_time(time: zip::DateTime) -> Option<String> {
    NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )
    .and_then(|date| {
        date.and_hms_opt(
            u32::from(time.hour()),
            u32::from(time.minute()),
            u32::from(time.second()),
        )
    })
    .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Local modification time of a file on disk
pub fn file_timestamp(path: &Path) -> Result<String, LoaderError> {
    let modified: DateTime<Local> = fs::metadata(path)?.modified()?.into();
    Ok(modified.naive_local().format(TIMESTAMP_FORMAT).to_string())
}
