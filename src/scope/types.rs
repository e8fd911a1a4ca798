#[derive(Debug, Clone, PartialEq)]
/// Why a query was refused.
pub enum RejectReason {
    /// No content words (empty, whitespace, symbols, stopwords only).
    EmptyQuery,
    /// Nothing has been ingested yet.
    EmptyCorpus,
    /// Too few query words are known to the corpus.
    InsufficientOverlap {
        /// Matched share of content words.
        score: f32,
    },
    /// The query names something the corpus does not cover.
    ConflictingEntity {
        /// The offending word, as typed.
        entity: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of scope classification.
pub enum ScopeDecision {
    InScope {
        /// Matched share of content words.
        overlap: f32,
    },
    OutOfScope(RejectReason),
}

impl ScopeDecision {
    pub fn is_in_scope(&self) -> bool {
        matches!(self, ScopeDecision::InScope { .. })
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            ScopeDecision::InScope { .. } => None,
            ScopeDecision::OutOfScope(reason) => Some(reason),
        }
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            ScopeDecision::InScope { .. } => "IN_SCOPE",
            ScopeDecision::OutOfScope(RejectReason::EmptyQuery) => "EMPTY_QUERY",
            ScopeDecision::OutOfScope(RejectReason::EmptyCorpus) => "EMPTY_CORPUS",
            ScopeDecision::OutOfScope(RejectReason::InsufficientOverlap { .. }) => {
                "INSUFFICIENT_OVERLAP"
            }
            ScopeDecision::OutOfScope(RejectReason::ConflictingEntity { .. }) => {
                "CONFLICTING_ENTITY"
            }
        }
    }
}

impl std::fmt::Display for ScopeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeDecision::InScope { overlap } => write!(f, "IN_SCOPE (overlap: {:.2})", overlap),
            ScopeDecision::OutOfScope(RejectReason::InsufficientOverlap { score }) => {
                write!(f, "INSUFFICIENT_OVERLAP (overlap: {:.2})", score)
            }
            ScopeDecision::OutOfScope(RejectReason::ConflictingEntity { entity }) => {
                write!(f, "CONFLICTING_ENTITY ({})", entity)
            }
            other => write!(f, "{}", other.debug_status()),
        }
    }
}
