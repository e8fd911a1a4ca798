use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::extractive::ExtractiveSynthesizer;
use super::generator::TextGenerator;
use super::{Answer, AnswerSynthesizer, Strategy, SynthesisMode};
use crate::constants::{DEFAULT_GENERATION_TIMEOUT_MS, NOT_FOUND_SENTINEL};
use crate::retrieval::ScoredChunk;
use crate::scope::AnalyzedQuery;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerativeConfig {
    /// Upper bound for one generator call. Default: 10s.
    pub timeout: Duration,
    /// Retrieved chunks placed in the context. Default: `3`.
    pub max_context_chunks: usize,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
            max_context_chunks: 3,
        }
    }
}

impl GenerativeConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout.is_zero() {
            return Err("generation timeout must be greater than zero".to_string());
        }
        if self.max_context_chunks == 0 {
            return Err("max_context_chunks must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Why a generated answer was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Discard {
    Timeout,
    Failed(String),
    NotFound,
    Ungrounded,
}

/// Delegates to a [`TextGenerator`], falling back to extraction once when the
/// generator cannot be trusted for this query.
pub struct GenerativeSynthesizer {
    generator: Arc<dyn TextGenerator>,
    fallback: ExtractiveSynthesizer,
    config: GenerativeConfig,
}

impl GenerativeSynthesizer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        fallback: ExtractiveSynthesizer,
        config: GenerativeConfig,
    ) -> Self {
        Self {
            generator,
            fallback,
            config,
        }
    }

    pub fn config(&self) -> &GenerativeConfig {
        &self.config
    }

    async fn attempt(&self, query: &AnalyzedQuery, context: &str) -> Result<String, Discard> {
        let call = self.generator.generate(context, query.raw());
        let text = match timeout(self.config.timeout, call).await {
            Err(_) => return Err(Discard::Timeout),
            Ok(Err(e)) => return Err(Discard::Failed(e.to_string())),
            Ok(Ok(text)) => text.trim().to_string(),
        };

        if text.is_empty() {
            return Err(Discard::Failed("empty output".to_string()));
        }
        if text.contains(NOT_FOUND_SENTINEL) {
            return Err(Discard::NotFound);
        }
        if !shares_content_term(&text, context) {
            return Err(Discard::Ungrounded);
        }
        Ok(text)
    }
}

/// An answer counts as grounded when it repeats at least one content term of
/// the context.
fn shares_content_term(answer: &str, context: &str) -> bool {
    let context_terms: HashSet<String> = text::terms(context).into_iter().collect();
    text::terms(answer)
        .iter()
        .any(|term| context_terms.contains(term))
}

#[async_trait]
impl AnswerSynthesizer for GenerativeSynthesizer {
    async fn synthesize(&self, query: &AnalyzedQuery, chunks: &[ScoredChunk]) -> Answer {
        if chunks.is_empty() {
            return Answer::out_of_scope();
        }

        let context = chunks
            .iter()
            .take(self.config.max_context_chunks)
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        match self.attempt(query, &context).await {
            Ok(text) => {
                debug!(generator = self.generator.name(), "Generated answer accepted");
                Answer::grounded(text, Strategy::Generative)
            }
            Err(reason) => {
                warn!(
                    generator = self.generator.name(),
                    reason = ?reason,
                    "Generated answer discarded, using extractive fallback"
                );
                Answer::grounded(
                    self.fallback.extract(query, chunks),
                    Strategy::ExtractiveFallback,
                )
            }
        }
    }

    fn mode(&self) -> SynthesisMode {
        SynthesisMode::Generative
    }
}
