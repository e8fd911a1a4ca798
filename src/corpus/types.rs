use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text;

pub type DocumentId = u64;
pub type ChunkId = u64;

/// An ingested document. Immutable once installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub text: String,
    /// Hex BLAKE3 of the whitespace-collapsed text.
    pub fingerprint: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Extracted text awaiting an id, fingerprint and timestamp.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub text: String,
}

impl NewDocument {
    pub fn new(
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        file_size: u64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            file_size,
            text: text.into(),
        }
    }

    /// A `text/plain` document whose size is the byte length of `text`.
    pub fn plain_text(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let size = text.len() as u64;
        Self::new(file_name, "text/plain", size, text)
    }
}

/// A contiguous span of a document's text, the unit of retrieval.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: ChunkId,
    pub document_id: DocumentId,
    /// Zero-based position within the owning document.
    pub position: usize,
    pub text: String,
    /// Normalized terms in order of appearance.
    pub terms: Vec<String>,
    pub term_freqs: HashMap<String, u32>,
    pub has_numeral: bool,
}

impl Chunk {
    pub fn new(id: ChunkId, document_id: DocumentId, position: usize, text: String) -> Self {
        let terms = text::terms(&text);
        let mut term_freqs: HashMap<String, u32> = HashMap::new();
        for term in &terms {
            *term_freqs.entry(term.clone()).or_default() += 1;
        }
        let has_numeral = terms
            .iter()
            .any(|t| t.chars().all(|c| c.is_ascii_digit()));

        Self {
            id,
            document_id,
            position,
            text,
            terms,
            term_freqs,
            has_numeral,
        }
    }

    pub fn token_count(&self) -> usize {
        self.terms.len()
    }

    pub fn term_frequency(&self, term: &str) -> u32 {
        self.term_freqs.get(term).copied().unwrap_or(0)
    }

    /// `true` when `first` is immediately followed by `second` somewhere in the chunk.
    pub fn contains_phrase(&self, first: &str, second: &str) -> bool {
        self.terms
            .windows(2)
            .any(|pair| pair[0] == first && pair[1] == second)
    }
}

/// Document metadata as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub upload_time: DateTime<Utc>,
    pub chunk_count: usize,
}

impl DocumentSummary {
    pub fn new(document: &Document, chunk_count: usize) -> Self {
        Self {
            id: document.id,
            file_name: document.file_name.clone(),
            file_type: document.file_type.clone(),
            file_size: document.file_size,
            upload_time: document.uploaded_at,
            chunk_count,
        }
    }
}

/// Result of installing a document into the corpus.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub document: Arc<Document>,
    pub chunk_ids: Vec<ChunkId>,
    /// Generation of the snapshot that first contained the document.
    pub generation: u64,
}

impl IngestReceipt {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::new(&self.document, self.chunk_ids.len())
    }
}
