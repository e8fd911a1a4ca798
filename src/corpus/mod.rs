//! Chunk store: documents, chunks and the snapshot queries read from.
//!
//! [`Corpus`] is read-mostly. Readers take a cheap `Arc` clone of the current
//! [`CorpusSnapshot`]; the [`Indexer`](crate::index::Indexer) is the only
//! writer and publishes a fully built replacement in one step.

pub mod snapshot;
pub mod types;


pub use snapshot::CorpusSnapshot;
pub use types::{
    Chunk, ChunkId, Document, DocumentId, DocumentSummary, IngestReceipt, NewDocument,
};

use std::sync::Arc;

use parking_lot::RwLock;

/// Shared handle to the current corpus snapshot.
#[derive(Debug, Default)]
pub struct Corpus {
    current: RwLock<Arc<CorpusSnapshot>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Stays valid and unchanged for as long as it is held.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    pub fn summaries(&self) -> Vec<DocumentSummary> {
        self.snapshot().summaries()
    }

    pub(crate) fn publish(&self, next: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let next = Arc::new(next);
        *self.current.write() = Arc::clone(&next);
        next
    }
}
