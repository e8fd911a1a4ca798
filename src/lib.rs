//! Docent library crate (used by the server and integration tests).
//!
//! Docent answers natural-language questions from the documents it has
//! ingested, and refuses everything else with the exact text `"Out of scope."`.
//!
//! # Public API Surface
//!
//! ## Ingestion
//! - [`IngestService`] - upload validation, text extraction, archiving
//! - [`Indexer`], [`Chunker`] - chunking and snapshot publication
//! - [`Corpus`], [`CorpusSnapshot`] - the immutable, swappable corpus view
//! - [`DocumentArchive`], [`FsDocumentArchive`] - document persistence
//!
//! ## Answering
//! - [`QueryPipeline`] - classify, retrieve, synthesize
//! - [`ScopeClassifier`], [`AnalyzedQuery`] - scope gating
//! - [`Retriever`] - lexical chunk ranking
//! - [`ExtractiveSynthesizer`], [`GenerativeSynthesizer`] - answer synthesis
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod ingest;
pub mod pipeline;
pub mod retrieval;
pub mod scope;
pub mod storage;
pub mod synthesis;
pub mod text;

#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use config::{Config, ConfigError};
pub use constants::{
    DOCENT_STATUS_ERROR, DOCENT_STATUS_GROUNDED, DOCENT_STATUS_HEADER, DOCENT_STATUS_HEALTHY,
    DOCENT_STATUS_NO_DOCUMENTS, DOCENT_STATUS_NOT_READY, DOCENT_STATUS_OUT_OF_SCOPE,
    DOCENT_STATUS_READY, DOCENT_STATUS_STORED, OUT_OF_SCOPE_RESPONSE,
};
pub use corpus::{
    Chunk, ChunkId, Corpus, CorpusSnapshot, Document, DocumentId, DocumentSummary, NewDocument,
};
pub use hashing::{fingerprint_text, hash_to_u64};
pub use index::{Chunker, ChunkerConfig, IndexError, Indexer, IndexerConfig};
pub use ingest::{FileKind, HydrationReport, IngestConfig, IngestError, IngestService};
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use retrieval::{Retriever, RetrieverConfig, ScoredChunk};
pub use scope::{AnalyzedQuery, RejectReason, ScopeClassifier, ScopeConfig, ScopeDecision};
#[cfg(any(test, feature = "mock"))]
pub use storage::MemoryArchive;
pub use storage::{DocumentArchive, FsDocumentArchive, StorageError};
#[cfg(any(test, feature = "mock"))]
pub use synthesis::ScriptedGenerator;
pub use synthesis::{
    Answer, AnswerSynthesizer, ExtractiveSynthesizer, GenaiGenerator, GenerativeSynthesizer,
    MockGenerator, Provenance, Strategy, SynthesisMode, TextGenerator,
};
