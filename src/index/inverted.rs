use std::collections::HashMap;

use crate::corpus::{Chunk, ChunkId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub chunk_id: ChunkId,
    pub term_freq: u32,
}

/// Term to postings map with the length statistics BM25 needs.
///
/// Postings for a term are kept in insertion order, which is chunk order.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    chunk_lengths: HashMap<ChunkId, u32>,
    total_length: u64,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chunk: &Chunk) {
        let mut terms: Vec<(&String, &u32)> = chunk.term_freqs.iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (term, &term_freq) in terms {
            self.postings.entry(term.clone()).or_default().push(Posting {
                chunk_id: chunk.id,
                term_freq,
            });
        }
        let length = chunk.token_count() as u32;
        self.chunk_lengths.insert(chunk.id, length);
        self.total_length += u64::from(length);
    }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Number of chunks containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    /// Occurrences of `term` across all chunks.
    pub fn collection_frequency(&self, term: &str) -> u64 {
        self.postings(term)
            .iter()
            .map(|p| u64::from(p.term_freq))
            .sum()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_lengths.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn chunk_length(&self, chunk_id: ChunkId) -> u32 {
        self.chunk_lengths.get(&chunk_id).copied().unwrap_or(0)
    }

    pub fn average_chunk_length(&self) -> f32 {
        if self.chunk_lengths.is_empty() {
            return 0.0;
        }
        self.total_length as f32 / self.chunk_lengths.len() as f32
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}
