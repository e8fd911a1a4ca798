use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use super::inverted::InvertedIndex;
use crate::constants::{DEFAULT_TOPIC_TERMS, FUZZY_MIN_TOKEN_LEN};
use crate::corpus::Chunk;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileConfig {
    /// How many of the most widespread terms count as topic terms. Default: `5`.
    pub topic_terms: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            topic_terms: DEFAULT_TOPIC_TERMS,
        }
    }
}

/// How a query term matched the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact(String),
    /// Misspelling within one edit of a vocabulary term.
    Corrected { from: String, to: String },
}

impl Resolution {
    /// The vocabulary term the query term resolved to.
    pub fn term(&self) -> &str {
        match self {
            Resolution::Exact(term) => term,
            Resolution::Corrected { to, .. } => to,
        }
    }

    pub fn is_corrected(&self) -> bool {
        matches!(self, Resolution::Corrected { .. })
    }
}

/// Summary of what the corpus is about, rebuilt with every snapshot.
#[derive(Debug, Clone, Default)]
pub struct CorpusProfile {
    /// Vocabulary bucketed by first character, each bucket sorted.
    by_initial: HashMap<char, Vec<String>>,
    topic_terms: Vec<String>,
    /// Terms written capitalized mid-sentence, with occurrence counts.
    entities: BTreeMap<String, u32>,
    subject: Option<String>,
}

impl CorpusProfile {
    pub fn build(chunks: &[Arc<Chunk>], index: &InvertedIndex, config: &ProfileConfig) -> Self {
        let mut by_initial: HashMap<char, Vec<String>> = HashMap::new();
        for term in index.terms() {
            if let Some(initial) = term.chars().next() {
                by_initial.entry(initial).or_default().push(term.to_string());
            }
        }
        for bucket in by_initial.values_mut() {
            bucket.sort_unstable();
        }

        let mut ranked: Vec<(&str, usize, u64)> = index
            .terms()
            .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
            .map(|t| (t, index.document_frequency(t), index.collection_frequency(t)))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(b.0)));
        let topic_terms = ranked
            .into_iter()
            .take(config.topic_terms)
            .map(|(t, _, _)| t.to_string())
            .collect();

        let mut entities: BTreeMap<String, u32> = BTreeMap::new();
        for chunk in chunks {
            for token in text::tokenize(&chunk.text) {
                if token.capitalized
                    && !token.sentence_start
                    && let Some(term) = token.term
                {
                    *entities.entry(term).or_default() += 1;
                }
            }
        }

        let mut subject: Option<(&String, u32)> = None;
        for (term, &count) in &entities {
            if subject.is_none_or(|(_, best)| count > best) {
                subject = Some((term, count));
            }
        }
        let subject = subject.map(|(term, _)| term.clone());

        Self {
            by_initial,
            topic_terms,
            entities,
            subject,
        }
    }

    /// Resolves a normalized term exactly, or within one edit when the term
    /// is long enough. Corrections must keep the first character; ties go to
    /// the more widespread term, then the lexicographically smaller one.
    pub fn resolve(&self, term: &str, index: &InvertedIndex) -> Option<Resolution> {
        if index.contains(term) {
            return Some(Resolution::Exact(term.to_string()));
        }
        if term.chars().count() < FUZZY_MIN_TOKEN_LEN || term.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let initial = term.chars().next()?;
        let mut best: Option<(&String, usize)> = None;
        for candidate in self.by_initial.get(&initial)? {
            if !text::within_one_edit(term, candidate) {
                continue;
            }
            let df = index.document_frequency(candidate);
            if best.is_none_or(|(_, best_df)| df > best_df) {
                best = Some((candidate, df));
            }
        }

        best.map(|(to, _)| Resolution::Corrected {
            from: term.to_string(),
            to: to.clone(),
        })
    }

    /// Most widespread terms, most widespread first.
    pub fn topic_terms(&self) -> &[String] {
        &self.topic_terms
    }

    pub fn is_topic_term(&self, term: &str) -> bool {
        self.topic_terms.iter().any(|t| t == term)
    }

    pub fn is_entity(&self, term: &str) -> bool {
        self.entities.contains_key(term)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// The entity the corpus mentions most often.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn vocabulary(&self) -> HashSet<&str> {
        self.by_initial
            .values()
            .flat_map(|bucket| bucket.iter().map(String::as_str))
            .collect()
    }
}
