use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;

use super::{Answer, AnswerSynthesizer, Strategy, SynthesisMode};
use crate::constants::DEFAULT_MAX_SENTENCES;
use crate::retrieval::ScoredChunk;
use crate::scope::AnalyzedQuery;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractiveConfig {
    /// Sentences selected by score. Default: `3`.
    pub max_sentences: usize,
    /// Top-ranked chunks considered. Default: `2`.
    pub max_chunks: usize,
    /// Added to sentences holding a numeral when the query asks for a count.
    pub quantity_bonus: f32,
    /// Share of the best sentence score a sentence needs to be kept.
    pub min_relative_score: f32,
    /// Lines pulled in after a selected heading or list lead-in.
    pub max_continuation_lines: usize,
}

impl Default for ExtractiveConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            max_chunks: 2,
            quantity_bonus: 0.5,
            min_relative_score: 0.5,
            max_continuation_lines: 6,
        }
    }
}

impl ExtractiveConfig {
    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        assert!(max_sentences > 0, "max_sentences must be at least 1");
        self.max_sentences = max_sentences;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_sentences == 0 || self.max_chunks == 0 {
            return Err("max_sentences and max_chunks must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_relative_score) {
            return Err(format!(
                "min_relative_score must be in [0.0, 1.0], got {}",
                self.min_relative_score
            ));
        }
        Ok(())
    }
}

/// `(chunk rank, line, sentence)`; orders sentences as they appear.
type SentenceKey = (usize, usize, usize);

/// Answers with verbatim sentences from the retrieved chunks.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSynthesizer {
    config: ExtractiveConfig,
}

impl ExtractiveSynthesizer {
    pub fn new(config: ExtractiveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractiveConfig {
        &self.config
    }

    /// Selects the best supporting sentences and renders them in document
    /// order. Sentences of one line are joined by a space, lines by `\n`.
    ///
    /// Returns an empty string only when `chunks` is empty.
    pub fn extract(&self, query: &AnalyzedQuery, chunks: &[ScoredChunk]) -> String {
        let cfg = &self.config;
        let chunks = &chunks[..chunks.len().min(cfg.max_chunks)];

        // lines[rank][line] -> sentences
        let lines: Vec<Vec<Vec<&str>>> = chunks
            .iter()
            .map(|scored| {
                scored
                    .chunk
                    .text
                    .lines()
                    .map(text::split_sentences)
                    .collect()
            })
            .collect();

        let mut scored: Vec<(SentenceKey, f32)> = Vec::new();
        for (rank, chunk_lines) in lines.iter().enumerate() {
            for (line, sentences) in chunk_lines.iter().enumerate() {
                for (idx, sentence) in sentences.iter().enumerate() {
                    let score = self.score_sentence(query, sentence);
                    if score > 0.0 {
                        scored.push(((rank, line, idx), score));
                    }
                }
            }
        }

        let best = scored.iter().map(|(_, s)| *s).fold(0.0_f32, f32::max);
        scored.retain(|(_, s)| *s >= best * cfg.min_relative_score);
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(cfg.max_sentences);

        let mut selected: BTreeSet<SentenceKey> = scored.iter().map(|(key, _)| *key).collect();
        if selected.is_empty() {
            let first_line = lines
                .first()
                .and_then(|chunk| chunk.iter().position(|sentences| !sentences.is_empty()));
            if let Some(line) = first_line {
                selected.insert((0, line, 0));
            }
        }

        for (rank, line, _) in selected.clone() {
            let chunk_lines = &lines[rank];
            if !opens_block(chunk_lines, line) {
                continue;
            }
            let following = (line + 1..chunk_lines.len()).take(cfg.max_continuation_lines);
            for next in following {
                for idx in 0..chunk_lines[next].len() {
                    selected.insert((rank, next, idx));
                }
            }
        }

        let mut rendered: BTreeMap<(usize, usize), Vec<&str>> = BTreeMap::new();
        for (rank, line, idx) in selected {
            rendered
                .entry((rank, line))
                .or_default()
                .push(lines[rank][line][idx]);
        }
        rendered
            .into_values()
            .map(|sentences| sentences.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn score_sentence(&self, query: &AnalyzedQuery, sentence: &str) -> f32 {
        let present: HashSet<String> = text::terms(sentence).into_iter().collect();
        let mut score: f32 = query
            .resolved_terms()
            .into_iter()
            .filter(|term| present.contains(*term))
            .map(|term| query.weight(term))
            .sum();
        if score > 0.0 && query.has_quantity_intent() && text::contains_numeral(sentence) {
            score += self.config.quantity_bonus;
        }
        score
    }
}

/// A heading (first line, no closing punctuation) or a list lead-in ending
/// in `:`.
fn opens_block(lines: &[Vec<&str>], line: usize) -> bool {
    let Some(last) = lines.get(line).and_then(|sentences| sentences.last()) else {
        return false;
    };
    if last.ends_with(':') {
        return true;
    }
    line == 0 && lines.len() > 1 && !last.ends_with(['.', '?', '!'])
}

#[async_trait]
impl AnswerSynthesizer for ExtractiveSynthesizer {
    async fn synthesize(&self, query: &AnalyzedQuery, chunks: &[ScoredChunk]) -> Answer {
        if chunks.is_empty() {
            return Answer::out_of_scope();
        }
        Answer::grounded(self.extract(query, chunks), Strategy::Extractive)
    }

    fn mode(&self) -> SynthesisMode {
        SynthesisMode::Extractive
    }
}
