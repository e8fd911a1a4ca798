use std::collections::HashMap;
use std::sync::Arc;

use super::types::{Chunk, ChunkId, Document, DocumentId, DocumentSummary};
use crate::index::{CorpusProfile, InvertedIndex, ProfileConfig, Resolution};

/// Immutable view of every installed document, its chunks, the inverted
/// index and the derived corpus profile.
///
/// Queries hold an `Arc` to one snapshot for their whole lifetime, so a
/// concurrent ingestion can never expose a half-indexed document.
#[derive(Debug)]
pub struct CorpusSnapshot {
    generation: u64,
    documents: Vec<Arc<Document>>,
    chunks: Vec<Arc<Chunk>>,
    slots: HashMap<ChunkId, usize>,
    index: InvertedIndex,
    profile: CorpusProfile,
    next_document_id: DocumentId,
    next_chunk_id: ChunkId,
}

impl CorpusSnapshot {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            documents: Vec::new(),
            chunks: Vec::new(),
            slots: HashMap::new(),
            index: InvertedIndex::new(),
            profile: CorpusProfile::default(),
            next_document_id: 1,
            next_chunk_id: 1,
        }
    }

    /// Indexes `chunks` and derives the profile. Documents are ordered by id
    /// and chunks by `(document_id, position)`.
    pub(crate) fn build(
        generation: u64,
        mut documents: Vec<Arc<Document>>,
        mut chunks: Vec<Arc<Chunk>>,
        next_document_id: DocumentId,
        next_chunk_id: ChunkId,
        profile_config: &ProfileConfig,
    ) -> Self {
        documents.sort_by_key(|d| d.id);
        chunks.sort_by_key(|c| (c.document_id, c.position));

        let mut index = InvertedIndex::new();
        let mut slots = HashMap::with_capacity(chunks.len());
        for (slot, chunk) in chunks.iter().enumerate() {
            index.insert(chunk);
            slots.insert(chunk.id, slot);
        }
        let profile = CorpusProfile::build(&chunks, &index, profile_config);

        Self {
            generation,
            documents,
            chunks,
            slots,
            index,
            profile,
            next_document_id,
            next_chunk_id,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when no chunk has been indexed.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents
            .binary_search_by_key(&id, |d| d.id)
            .ok()
            .map(|i| &self.documents[i])
    }

    pub fn find_by_fingerprint(&self, fingerprint: &str) -> Option<&Arc<Document>> {
        self.documents.iter().find(|d| d.fingerprint == fingerprint)
    }

    pub fn chunks(&self) -> &[Arc<Chunk>] {
        &self.chunks
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Arc<Chunk>> {
        self.slots.get(&id).map(|&slot| &self.chunks[slot])
    }

    pub fn chunk_count_of(&self, document_id: DocumentId) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.document_id == document_id)
            .count()
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn profile(&self) -> &CorpusProfile {
        &self.profile
    }

    /// Matches a normalized query term against the vocabulary.
    pub fn resolve(&self, term: &str) -> Option<Resolution> {
        self.profile.resolve(term, &self.index)
    }

    /// Inverse document frequency of `term` over chunks (BM25 form, never negative).
    pub fn idf(&self, term: &str) -> f32 {
        let n = self.index.chunk_count() as f32;
        let df = self.index.document_frequency(term) as f32;
        if df == 0.0 {
            return 0.0;
        }
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    pub fn summaries(&self) -> Vec<DocumentSummary> {
        let mut counts: HashMap<DocumentId, usize> = HashMap::new();
        for chunk in &self.chunks {
            *counts.entry(chunk.document_id).or_default() += 1;
        }
        self.documents
            .iter()
            .map(|d| DocumentSummary::new(d, counts.get(&d.id).copied().unwrap_or(0)))
            .collect()
    }

    pub(crate) fn next_document_id(&self) -> DocumentId {
        self.next_document_id
    }

    pub(crate) fn next_chunk_id(&self) -> ChunkId {
        self.next_chunk_id
    }
}

impl Default for CorpusSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
