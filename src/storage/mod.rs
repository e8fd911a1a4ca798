//! Document persistence.
//!
//! The archive stores what the indexer needs to rebuild the corpus at startup:
//! the extracted text and document metadata. Chunks and the index are always
//! rebuilt, never persisted.

pub mod error;
pub mod fs;
#[cfg(any(test, feature = "mock"))]
pub mod memory;

#[cfg(test)]
mod tests;

pub use error::{StorageError, StorageResult};
pub use fs::FsDocumentArchive;
#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryArchive;

use crate::corpus::{Document, DocumentId};

/// Durable home for ingested documents.
///
/// Methods are blocking; async callers run them on the blocking pool.
pub trait DocumentArchive: Send + Sync {
    /// Persists `document`, replacing any previous copy with the same id.
    fn save(&self, document: &Document) -> StorageResult<()>;

    /// Deletes the document. Deleting an absent document succeeds.
    fn remove(&self, id: DocumentId) -> StorageResult<()>;

    /// Every readable document, ordered by id.
    fn load_all(&self) -> StorageResult<Vec<Document>>;

    /// `true` when the archive can currently accept writes.
    fn is_available(&self) -> bool;
}
