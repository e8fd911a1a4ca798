//! Scope classifier: decides whether a query is answerable from the corpus.
//!
//! Classification is a pure function of the query and one corpus snapshot.
//! A query is in scope when more than `min_overlap` of its content words
//! resolve against the vocabulary and none of them names an entity the corpus
//! does not cover.

pub mod query;
pub mod types;


pub use query::{AnalyzedQuery, QueryTerm};
pub use types::{RejectReason, ScopeDecision};

use tracing::debug;

use crate::constants::DEFAULT_MIN_OVERLAP;
use crate::corpus::CorpusSnapshot;
use crate::index::CorpusProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeConfig {
    /// Overlap must be strictly greater than this. Default: `0.5`.
    pub min_overlap: f32,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
        }
    }
}

impl ScopeConfig {
    pub fn with_min_overlap(mut self, min_overlap: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&min_overlap),
            "min_overlap must be in [0.0, 1.0)"
        );
        self.min_overlap = min_overlap;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.min_overlap) {
            return Err(format!(
                "min_overlap must be in [0.0, 1.0), got {}",
                self.min_overlap
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopeClassifier {
    config: ScopeConfig,
}

impl ScopeClassifier {
    pub fn new(config: ScopeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn classify(&self, query: &AnalyzedQuery, snapshot: &CorpusSnapshot) -> ScopeDecision {
        if snapshot.is_empty() {
            return ScopeDecision::OutOfScope(RejectReason::EmptyCorpus);
        }
        if query.is_empty() {
            return ScopeDecision::OutOfScope(RejectReason::EmptyQuery);
        }

        if let Some(entity) = conflicting_entity(query, snapshot.profile()) {
            debug!(entity = %entity, "Query names an entity outside the corpus");
            return ScopeDecision::OutOfScope(RejectReason::ConflictingEntity { entity });
        }

        let overlap = query.overlap();
        if overlap <= self.config.min_overlap {
            return ScopeDecision::OutOfScope(RejectReason::InsufficientOverlap { score: overlap });
        }

        ScopeDecision::InScope { overlap }
    }
}

/// First query word that looks like a name the corpus does not know.
///
/// Three shapes count:
/// - a capitalized word after the first one that has no exact vocabulary match
///   and is not a corpus entity even after typo correction;
/// - an unknown word directly modifying a corpus topic term ("microsoft
///   interview", "panel interview");
/// - an unknown word set off from a known term by a function word, where it
///   names whose rounds or areas are meant ("rounds at amazon", "rounds does
///   microsoft have").
///
/// An unknown word directly after a known one is a head noun ("interview
/// mistakes") and never conflicts. Filler words were already dropped during
/// analysis, so ordinary phrasing ("what is used", "typical tips") cannot be
/// mistaken for a name.
fn conflicting_entity(query: &AnalyzedQuery, profile: &CorpusProfile) -> Option<String> {
    let terms = query.terms();

    if query.capitalization_signal() {
        let named = terms.iter().find(|t| {
            t.capitalized
                && !t.first_word
                && !t.resolution.as_ref().is_some_and(|r| !r.is_corrected())
                && !t.resolved().is_some_and(|r| profile.is_entity(r))
        });
        if let Some(term) = named {
            return Some(term.surface.clone());
        }
    }

    terms.windows(2).find_map(|pair| {
        let (left, right) = (&pair[0], &pair[1]);
        let modifies_topic = is_unknown_name(left)
            && !right.after_gap
            && right
                .resolved()
                .is_some_and(|topic| profile.is_topic_term(topic));
        if modifies_topic {
            return Some(left.surface.clone());
        }
        let complements_known =
            is_unknown_name(right) && right.after_gap && left.resolution.is_some();
        complements_known.then(|| right.surface.clone())
    })
}

fn is_unknown_name(term: &QueryTerm) -> bool {
    term.resolution.is_none() && !term.term.chars().all(|c| c.is_ascii_digit())
}
