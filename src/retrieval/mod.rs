//! Lexical retriever: BM25 with phrase, quantity and brevity adjustments.


use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::constants::DEFAULT_TOP_K;
use crate::corpus::{Chunk, ChunkId, CorpusSnapshot};
use crate::scope::AnalyzedQuery;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrieverConfig {
    /// Chunks returned per query. Default: `3`.
    pub top_k: usize,
    pub k1: f32,
    pub b: f32,
    /// Added per adjacent query-term pair found adjacent in the chunk.
    pub phrase_bonus: f32,
    /// Added when the query asks for a count and the chunk has a numeral.
    pub quantity_bonus: f32,
    /// Chunks with fewer terms than this are scaled down proportionally.
    pub min_tokens: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            k1: 1.2,
            b: 0.75,
            phrase_bonus: 0.5,
            quantity_bonus: 0.5,
            min_tokens: 8,
        }
    }
}

impl RetrieverConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        assert!(top_k > 0, "top_k must be at least 1");
        self.top_k = top_k;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        if self.k1 < 0.0 || !(0.0..=1.0).contains(&self.b) {
            return Err(format!(
                "BM25 parameters out of range: k1={}, b={}",
                self.k1, self.b
            ));
        }
        Ok(())
    }
}

/// A retrieved chunk and its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Arc<Chunk>,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Retriever {
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(config: RetrieverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Top `config.top_k` chunks.
    pub fn retrieve(&self, query: &AnalyzedQuery, snapshot: &CorpusSnapshot) -> Vec<ScoredChunk> {
        self.retrieve_k(query, snapshot, self.config.top_k)
    }

    /// Best `k` chunks by descending score; ties go to the earlier chunk in
    /// document order. Chunks sharing no resolved term are never returned.
    pub fn retrieve_k(
        &self,
        query: &AnalyzedQuery,
        snapshot: &CorpusSnapshot,
        k: usize,
    ) -> Vec<ScoredChunk> {
        let terms = query.resolved_terms();
        if terms.is_empty() || k == 0 {
            return Vec::new();
        }

        let index = snapshot.index();
        let avg_len = index.average_chunk_length().max(1.0);
        let cfg = &self.config;

        let mut bm25: HashMap<ChunkId, f32> = HashMap::new();
        for term in &terms {
            let idf = snapshot.idf(term);
            for posting in index.postings(term) {
                let tf = posting.term_freq as f32;
                let len = index.chunk_length(posting.chunk_id) as f32;
                let norm = tf + cfg.k1 * (1.0 - cfg.b + cfg.b * len / avg_len);
                *bm25.entry(posting.chunk_id).or_default() += idf * tf * (cfg.k1 + 1.0) / norm;
            }
        }

        let pairs = query.adjacent_pairs();
        let mut scored: Vec<ScoredChunk> = bm25
            .into_iter()
            .filter_map(|(id, base)| {
                let chunk = snapshot.chunk(id)?;
                let phrases = pairs
                    .iter()
                    .filter(|(first, second)| chunk.contains_phrase(first, second))
                    .count();
                let mut score = base + cfg.phrase_bonus * phrases as f32;
                if query.has_quantity_intent() && chunk.has_numeral {
                    score += cfg.quantity_bonus;
                }
                if cfg.min_tokens > 0 {
                    score *= (chunk.token_count() as f32 / cfg.min_tokens as f32).min(1.0);
                }
                (score > 0.0).then(|| ScoredChunk {
                    chunk: Arc::clone(chunk),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    (a.chunk.document_id, a.chunk.position)
                        .cmp(&(b.chunk.document_id, b.chunk.position))
                })
        });
        scored.truncate(k);

        debug!(
            terms = ?terms,
            hits = scored.len(),
            top_score = scored.first().map(|s| s.score).unwrap_or(0.0),
            "Retrieval complete"
        );

        scored
    }
}
