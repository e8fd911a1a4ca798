//! Indexer: chunking, the inverted index, the corpus profile, and the single
//! writer that installs and removes documents.

pub mod chunker;
pub mod error;
pub mod inverted;
pub mod profile;

#[cfg(test)]
mod tests;

pub use chunker::{Chunker, ChunkerConfig};
pub use error::{IndexError, IndexResult};
pub use inverted::{InvertedIndex, Posting};
pub use profile::{CorpusProfile, ProfileConfig, Resolution};

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use crate::corpus::{
    Chunk, Corpus, CorpusSnapshot, Document, DocumentId, IngestReceipt, NewDocument,
};
use crate::hashing::fingerprint_text;
use crate::storage::StorageError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexerConfig {
    pub chunker: ChunkerConfig,
    pub profile: ProfileConfig,
}

/// Sole mutator of a [`Corpus`].
///
/// Each change builds a complete successor snapshot while holding the writer
/// lock and then publishes it, so readers see a document with all of its
/// chunks or not at all.
#[derive(Debug)]
pub struct Indexer {
    corpus: Arc<Corpus>,
    chunker: Chunker,
    profile: ProfileConfig,
    writer: Mutex<()>,
}

impl Indexer {
    pub fn new(corpus: Arc<Corpus>, config: IndexerConfig) -> Self {
        Self {
            corpus,
            chunker: Chunker::new(config.chunker),
            profile: config.profile,
            writer: Mutex::new(()),
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn ingest(&self, document: NewDocument) -> IndexResult<IngestReceipt> {
        self.ingest_with(document, |_| Ok(()))
    }

    /// Installs a new document. `commit` runs after chunking succeeds and
    /// before the snapshot is published; an error from it aborts the ingest.
    #[instrument(skip_all, fields(file_name = %document.file_name))]
    pub fn ingest_with<F>(&self, document: NewDocument, commit: F) -> IndexResult<IngestReceipt>
    where
        F: FnOnce(&Document) -> Result<(), StorageError>,
    {
        let _guard = self.writer.lock();
        let base = self.corpus.snapshot();

        let fingerprint = fingerprint_text(&document.text);
        if let Some(existing) = base.find_by_fingerprint(&fingerprint) {
            debug!(existing = existing.id, "Duplicate content rejected");
            return Err(IndexError::Duplicate {
                existing: existing.id,
                file_name: document.file_name,
            });
        }

        let document = Document {
            id: base.next_document_id(),
            file_name: document.file_name,
            file_type: document.file_type,
            file_size: document.file_size,
            text: document.text,
            fingerprint,
            uploaded_at: Utc::now(),
        };

        self.install(&base, document, commit)
    }

    /// Re-installs a previously persisted document, keeping its id and timestamp.
    #[instrument(skip_all, fields(document_id = document.id))]
    pub fn restore(&self, document: Document) -> IndexResult<IngestReceipt> {
        let _guard = self.writer.lock();
        let base = self.corpus.snapshot();

        let clash = base
            .document(document.id)
            .or_else(|| base.find_by_fingerprint(&document.fingerprint));
        if let Some(existing) = clash {
            return Err(IndexError::Duplicate {
                existing: existing.id,
                file_name: document.file_name,
            });
        }

        self.install(&base, document, |_| Ok(()))
    }

    pub fn remove(&self, id: DocumentId) -> IndexResult<Arc<Document>> {
        self.remove_with(id, |_| Ok(()))
    }

    /// Removes a document and all of its chunks. `commit` runs before the
    /// reduced snapshot is published.
    #[instrument(skip(self, commit))]
    pub fn remove_with<F>(&self, id: DocumentId, commit: F) -> IndexResult<Arc<Document>>
    where
        F: FnOnce(&Document) -> Result<(), StorageError>,
    {
        let _guard = self.writer.lock();
        let base = self.corpus.snapshot();

        let removed = base
            .document(id)
            .cloned()
            .ok_or(IndexError::NotFound { id })?;
        commit(&removed)?;

        let documents = base
            .documents()
            .iter()
            .filter(|d| d.id != id)
            .cloned()
            .collect();
        let chunks = base
            .chunks()
            .iter()
            .filter(|c| c.document_id != id)
            .cloned()
            .collect();

        let next = CorpusSnapshot::build(
            base.generation() + 1,
            documents,
            chunks,
            base.next_document_id(),
            base.next_chunk_id(),
            &self.profile,
        );
        let published = self.corpus.publish(next);

        info!(
            document_id = id,
            generation = published.generation(),
            chunks = published.chunks().len(),
            "Document removed"
        );
        Ok(removed)
    }

    fn install<F>(
        &self,
        base: &CorpusSnapshot,
        document: Document,
        commit: F,
    ) -> IndexResult<IngestReceipt>
    where
        F: FnOnce(&Document) -> Result<(), StorageError>,
    {
        let pieces = self.chunker.split(&document.text);
        if pieces.is_empty() {
            return Err(IndexError::EmptyDocument {
                file_name: document.file_name,
            });
        }

        let first_chunk_id = base.next_chunk_id();
        let new_chunks: Vec<Arc<Chunk>> = pieces
            .into_iter()
            .enumerate()
            .map(|(position, text)| {
                Arc::new(Chunk::new(
                    first_chunk_id + position as u64,
                    document.id,
                    position,
                    text,
                ))
            })
            .collect();
        let chunk_ids: Vec<_> = new_chunks.iter().map(|c| c.id).collect();
        let next_chunk_id = first_chunk_id + new_chunks.len() as u64;

        commit(&document)?;

        let document = Arc::new(document);
        let mut documents = base.documents().to_vec();
        documents.push(Arc::clone(&document));
        let mut chunks = base.chunks().to_vec();
        chunks.extend(new_chunks);

        let next = CorpusSnapshot::build(
            base.generation() + 1,
            documents,
            chunks,
            base.next_document_id().max(document.id + 1),
            next_chunk_id,
            &self.profile,
        );
        let published = self.corpus.publish(next);

        info!(
            document_id = document.id,
            chunks = chunk_ids.len(),
            generation = published.generation(),
            subject = published.profile().subject().unwrap_or("-"),
            "Document indexed"
        );

        Ok(IngestReceipt {
            document,
            chunk_ids,
            generation: published.generation(),
        })
    }
}
