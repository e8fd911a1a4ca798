use serde::{Deserialize, Serialize};

use crate::synthesis::{Provenance, Strategy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply to `POST /api/chat/message`.
///
/// `response` is the answer text, or exactly `"Out of scope."` when the
/// question cannot be answered from the ingested documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub response: String,
    pub source: Provenance,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub strategy: Option<Strategy>,
}
