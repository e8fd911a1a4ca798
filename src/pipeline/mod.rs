//! Query pipeline: classify, then either refuse or retrieve and synthesize.
//!
//! Each call pins one corpus snapshot, so a concurrent ingestion never changes
//! the corpus a query is being answered from. Nothing is retained between
//! calls.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::corpus::Corpus;
use crate::hashing::hash_to_u64;
use crate::retrieval::{Retriever, ScoredChunk};
use crate::scope::{AnalyzedQuery, RejectReason, ScopeClassifier, ScopeDecision};
use crate::synthesis::{Answer, AnswerSynthesizer, SynthesisMode};

/// Everything known about one answered query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub id: Uuid,
    pub query: AnalyzedQuery,
    pub decision: ScopeDecision,
    /// Empty when the query was refused.
    pub chunks: Vec<ScoredChunk>,
    pub answer: Answer,
    /// Snapshot generation the query was answered against.
    pub generation: u64,
    pub elapsed: Duration,
}

pub struct QueryPipeline {
    corpus: Arc<Corpus>,
    classifier: ScopeClassifier,
    retriever: Retriever,
    synthesizer: Arc<dyn AnswerSynthesizer>,
}

impl QueryPipeline {
    pub fn new(
        corpus: Arc<Corpus>,
        classifier: ScopeClassifier,
        retriever: Retriever,
        synthesizer: Arc<dyn AnswerSynthesizer>,
    ) -> Self {
        Self {
            corpus,
            classifier,
            retriever,
            synthesizer,
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn synthesis_mode(&self) -> SynthesisMode {
        self.synthesizer.mode()
    }

    #[instrument(
        name = "query",
        skip(self, raw),
        fields(query_id = tracing::field::Empty, query_hash = tracing::field::Empty)
    )]
    pub async fn answer(&self, raw: &str) -> QueryOutcome {
        let started = Instant::now();
        let id = Uuid::new_v4();
        let span = tracing::Span::current();
        span.record("query_id", tracing::field::display(&id));
        span.record("query_hash", hash_to_u64(raw.as_bytes()));

        let snapshot = self.corpus.snapshot();
        let query = AnalyzedQuery::analyze(raw, &snapshot);
        let decision = self.classifier.classify(&query, &snapshot);
        debug!(decision = %decision, terms = query.terms().len(), "Query classified");

        let (chunks, answer) = match &decision {
            ScopeDecision::OutOfScope(RejectReason::EmptyCorpus) => {
                (Vec::new(), Answer::no_documents())
            }
            ScopeDecision::OutOfScope(_) => (Vec::new(), Answer::out_of_scope()),
            ScopeDecision::InScope { .. } => {
                let chunks = self.retriever.retrieve(&query, &snapshot);
                if chunks.is_empty() {
                    warn!(
                        decision = %decision,
                        "Classifier accepted a query the retriever found nothing for"
                    );
                    (chunks, Answer::out_of_scope())
                } else {
                    let answer = self.synthesizer.synthesize(&query, &chunks).await;
                    (chunks, answer)
                }
            }
        };

        let elapsed = started.elapsed();
        info!(
            provenance = %answer.provenance,
            strategy = answer.strategy.map(|s| s.as_str()).unwrap_or("none"),
            chunks = chunks.len(),
            generation = snapshot.generation(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Query answered"
        );

        QueryOutcome {
            id,
            query,
            decision,
            chunks,
            answer,
            generation: snapshot.generation(),
            elapsed,
        }
    }
}
