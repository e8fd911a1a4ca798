//! Answer synthesis.
//!
//! Both strategies honour one contract: given an analyzed query and its
//! ranked chunks they return an answer grounded in those chunks. The
//! generative strategy degrades to extraction, so answer content never
//! depends on a model being reachable.

pub mod error;
pub mod extractive;
pub mod generative;
pub mod generator;
pub mod types;


pub use error::{GenerationError, GenerationResult};
pub use extractive::{ExtractiveConfig, ExtractiveSynthesizer};
pub use generative::{GenerativeConfig, GenerativeSynthesizer};
#[cfg(any(test, feature = "mock"))]
pub use generator::{Script, ScriptedGenerator};
pub use generator::{GenaiGenerator, MockGenerator, TextGenerator, build_prompt};
pub use types::{Answer, Provenance, Strategy, SynthesisMode};

use async_trait::async_trait;

use crate::retrieval::ScoredChunk;
use crate::scope::AnalyzedQuery;

#[async_trait]
/// Turns ranked chunks into an answer.
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(&self, query: &AnalyzedQuery, chunks: &[ScoredChunk]) -> Answer;

    fn mode(&self) -> SynthesisMode;
}
