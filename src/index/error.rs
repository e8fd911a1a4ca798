use thiserror::Error;

use crate::corpus::DocumentId;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("document '{file_name}' duplicates existing document {existing}")]
    Duplicate {
        existing: DocumentId,
        file_name: String,
    },

    #[error("document '{file_name}' contains no indexable text")]
    EmptyDocument { file_name: String },

    #[error("document {id} not found")]
    NotFound { id: DocumentId },

    #[error("failed to persist document: {0}")]
    Persist(#[from] StorageError),
}

pub type IndexResult<T> = Result<T, IndexError>;
