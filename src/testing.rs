//! Fixtures shared by unit and integration tests.

use std::sync::Arc;

use crate::corpus::{Corpus, NewDocument};
use crate::index::{Indexer, IndexerConfig};

/// A short interview preparation guide used throughout the test suites.
pub const INTERVIEW_GUIDE: &str = include_str!("../tests/fixtures/interview_guide.txt");

pub const INTERVIEW_GUIDE_NAME: &str = "interview_guide.txt";

/// Indexer over a fresh corpus with default configuration.
pub fn indexer() -> Indexer {
    Indexer::new(Arc::new(Corpus::new()), IndexerConfig::default())
}

/// Indexer whose corpus already holds the interview guide.
pub fn interview_guide_indexer() -> Indexer {
    let indexer = indexer();
    indexer
        .ingest(NewDocument::plain_text(INTERVIEW_GUIDE_NAME, INTERVIEW_GUIDE))
        .expect("fixture document indexes");
    indexer
}
