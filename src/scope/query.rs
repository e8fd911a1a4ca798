use std::collections::HashSet;

use crate::corpus::CorpusSnapshot;
use crate::index::Resolution;
use crate::text;

/// One content word of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTerm {
    /// The word as the user typed it.
    pub surface: String,
    /// Normalized form.
    pub term: String,
    /// Vocabulary match, if any.
    pub resolution: Option<Resolution>,
    /// Typed with a leading capital.
    pub capitalized: bool,
    /// First word of the raw query.
    pub first_word: bool,
    /// A function word or dropped filler word sits between this term and the
    /// previous content word ("rounds *at* amazon").
    pub after_gap: bool,
    /// IDF of the resolved term; zero when unresolved.
    pub weight: f32,
}

impl QueryTerm {
    pub fn resolved(&self) -> Option<&str> {
        self.resolution.as_ref().map(Resolution::term)
    }
}

/// A raw query normalized and resolved against one corpus snapshot.
#[derive(Debug, Clone)]
pub struct AnalyzedQuery {
    raw: String,
    terms: Vec<QueryTerm>,
    quantity_intent: bool,
    capitalization_signal: bool,
}

impl AnalyzedQuery {
    pub fn analyze(raw: &str, snapshot: &CorpusSnapshot) -> Self {
        let tokens = text::tokenize(raw);

        let words: Vec<&text::Token> = tokens
            .iter()
            .filter(|t| t.surface.chars().next().is_some_and(char::is_alphabetic))
            .collect();
        let capitalization_signal = match words.split_first() {
            Some((_, rest)) if !rest.is_empty() => {
                let capitalized = rest.iter().filter(|t| t.capitalized).count();
                capitalized * 2 < rest.len()
            }
            _ => false,
        };

        let lowered: Vec<String> = tokens.iter().map(|t| t.surface.to_lowercase()).collect();
        let quantity_intent = lowered
            .windows(2)
            .any(|w| w[0] == "how" && (w[1] == "many" || w[1] == "much"))
            || lowered
                .iter()
                .any(|w| matches!(w.as_str(), "number" | "total" | "count" | "amount"));

        let mut terms = Vec::new();
        let mut gap = false;
        for (position, token) in tokens.iter().enumerate() {
            let Some(term) = token.term.clone() else {
                if token.surface.chars().nth(1).is_some()
                    && token.surface.chars().all(char::is_alphabetic)
                {
                    gap = true;
                }
                continue;
            };
            // a misspelled plural can stem too short to correct ("focas"),
            // so the unstemmed word gets a second chance
            let resolution = snapshot.resolve(&term).or_else(|| {
                let lower = token.surface.to_lowercase();
                (lower != term).then(|| snapshot.resolve(&lower)).flatten()
            });
            if resolution.is_none() && text::is_filler(&term) {
                gap = true;
                continue;
            }
            let weight = resolution
                .as_ref()
                .map(|r| snapshot.idf(r.term()))
                .unwrap_or(0.0);
            terms.push(QueryTerm {
                surface: token.surface.clone(),
                term,
                resolution,
                capitalized: token.capitalized,
                first_word: position == 0,
                after_gap: std::mem::take(&mut gap),
                weight,
            });
        }

        Self {
            raw: raw.to_string(),
            terms,
            quantity_intent,
            capitalization_signal,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    /// `true` when the query has no content words at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Distinct resolved vocabulary terms, in query order.
    pub fn resolved_terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.terms
            .iter()
            .filter_map(QueryTerm::resolved)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Resolved terms of adjacent content words, in query order.
    pub fn adjacent_pairs(&self) -> Vec<(&str, &str)> {
        self.terms
            .windows(2)
            .filter_map(|pair| Some((pair[0].resolved()?, pair[1].resolved()?)))
            .collect()
    }

    pub fn weight(&self, term: &str) -> f32 {
        self.terms
            .iter()
            .find(|t| t.resolved() == Some(term))
            .map(|t| t.weight)
            .unwrap_or(0.0)
    }

    /// Share of content words that resolved against the vocabulary.
    pub fn overlap(&self) -> f32 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let matched = self.terms.iter().filter(|t| t.resolution.is_some()).count();
        matched as f32 / self.terms.len() as f32
    }

    /// The query asks for a count or amount.
    pub fn has_quantity_intent(&self) -> bool {
        self.quantity_intent
    }

    /// Mid-query capitals are meaningful: fewer than half of the words after
    /// the first are capitalized, so the query is neither title case nor
    /// shouting.
    pub fn capitalization_signal(&self) -> bool {
        self.capitalization_signal
    }
}
