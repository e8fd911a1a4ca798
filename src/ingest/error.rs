use thiserror::Error;

use crate::corpus::DocumentId;
use crate::index::IndexError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
/// Text extraction errors.
pub enum ExtractError {
    /// The external extraction tool could not be started.
    #[error("extraction tool '{tool}' unavailable: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure.
    #[error("extraction with '{tool}' failed: {message}")]
    Failed { tool: String, message: String },

    /// The upload claims a container format it does not follow.
    #[error("malformed {format} document: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
/// Errors surfaced by the ingest service.
pub enum IngestError {
    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("uploaded file is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("unsupported file type: '{file_name}' (expected .pdf, .docx, .txt or .md)")]
    Unsupported { file_name: String },

    #[error("no text could be extracted from '{file_name}'")]
    NoText { file_name: String },

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("'{file_name}' duplicates existing document {existing}")]
    Duplicate {
        existing: DocumentId,
        file_name: String,
    },

    #[error("document {id} not found")]
    NotFound { id: DocumentId },

    #[error("document archive unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("internal ingest error: {0}")]
    Internal(String),
}

impl From<IndexError> for IngestError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Duplicate {
                existing,
                file_name,
            } => IngestError::Duplicate {
                existing,
                file_name,
            },
            IndexError::EmptyDocument { file_name } => IngestError::NoText { file_name },
            IndexError::NotFound { id } => IngestError::NotFound { id },
            IndexError::Persist(e) => IngestError::Storage(e),
        }
    }
}

/// Convenience result type for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;
