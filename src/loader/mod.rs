pub mod archive;
mod canvas;
mod canvas_api;
pub mod error;
mod piazza;

use async_trait::async_trait;

use crate::document::Document;

pub use canvas::CanvasLoader;
pub use canvas_api::CanvasApiLoader;
pub use error::LoaderError;
pub use piazza::PiazzaLoader;

#[cfg(test)]
use mockall::automock;

/// Produces the flat document sequence a course graph is built from
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Document>, LoaderError>;
}
