//! Cross-cutting, shared constants.
//!
//! The refusal literal and the provenance tags are part of the wire contract.
//! Clients compare against them byte-for-byte, so they live here rather than
//! next to the code that happens to emit them.

/// Exact response body for any query that is not answerable from the corpus.
pub const OUT_OF_SCOPE_RESPONSE: &str = "Out of scope.";

/// Sentinel a generator is asked to emit when the context lacks the answer.
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

pub const DOCENT_STATUS_HEADER: &str = "X-Docent-Status";
pub const DOCENT_STATUS_HEALTHY: &str = "healthy";
pub const DOCENT_STATUS_READY: &str = "ready";
pub const DOCENT_STATUS_NOT_READY: &str = "not_ready";
pub const DOCENT_STATUS_GROUNDED: &str = "grounded";
pub const DOCENT_STATUS_OUT_OF_SCOPE: &str = "out_of_scope";
pub const DOCENT_STATUS_NO_DOCUMENTS: &str = "no_documents";
pub const DOCENT_STATUS_STORED: &str = "stored";
pub const DOCENT_STATUS_LISTED: &str = "listed";
pub const DOCENT_STATUS_REMOVED: &str = "removed";
pub const DOCENT_STATUS_ERROR: &str = "error";

pub const DEFAULT_CHUNK_MAX_CHARS: usize = 1000;
pub const DEFAULT_CHUNK_MIN_CHARS: usize = 40;

/// Fraction of query content tokens that must resolve against the corpus.
/// A query is in scope only when its overlap is strictly greater.
pub const DEFAULT_MIN_OVERLAP: f32 = 0.5;

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_TOPIC_TERMS: usize = 5;
pub const DEFAULT_MAX_SENTENCES: usize = 3;

pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
pub const DEFAULT_PDFTOTEXT_BIN: &str = "pdftotext";

/// Minimum token length for typo-tolerant vocabulary matching.
pub const FUZZY_MIN_TOKEN_LEN: usize = 5;
