//! Ingest service: uploads in, indexed and archived documents out.
//!
//! Validation and extraction happen first, off the writer lock. The archive
//! write then runs inside the indexer's commit hook, so a document is visible
//! to queries only once it is durable, and a failed write publishes nothing.

pub mod error;
pub mod extract;


pub use error::{ExtractError, IngestError, IngestResult};
pub use extract::{
    DocxTextExtractor, FileKind, PdfTextExtractor, PlainTextExtractor, TextExtractor,
};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PDFTOTEXT_BIN};
use crate::corpus::{DocumentId, DocumentSummary, NewDocument};
use crate::index::{IndexError, Indexer};
use crate::storage::DocumentArchive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Largest accepted upload. Default: 10 MiB.
    pub max_upload_bytes: usize,
    /// `pdftotext` executable. Default: looked up on `PATH`.
    pub pdftotext_path: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pdftotext_path: PathBuf::from(DEFAULT_PDFTOTEXT_BIN),
        }
    }
}

/// Result of re-ingesting the archive at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub restored: usize,
    pub skipped: usize,
}

pub struct IngestService {
    indexer: Arc<Indexer>,
    archive: Arc<dyn DocumentArchive>,
    extractors: HashMap<FileKind, Arc<dyn TextExtractor>>,
    max_upload_bytes: usize,
}

impl IngestService {
    pub fn new(
        indexer: Arc<Indexer>,
        archive: Arc<dyn DocumentArchive>,
        config: IngestConfig,
    ) -> Self {
        let plain: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor);
        let mut extractors: HashMap<FileKind, Arc<dyn TextExtractor>> = HashMap::new();
        extractors.insert(FileKind::PlainText, Arc::clone(&plain));
        extractors.insert(FileKind::Markdown, plain);
        extractors.insert(
            FileKind::Pdf,
            Arc::new(PdfTextExtractor::new(config.pdftotext_path)),
        );
        extractors.insert(FileKind::Docx, Arc::new(DocxTextExtractor));

        Self {
            indexer,
            archive,
            extractors,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Replaces the extractor used for `kind`.
    pub fn with_extractor(mut self, kind: FileKind, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors.insert(kind, extractor);
        self
    }

    pub fn indexer(&self) -> &Arc<Indexer> {
        &self.indexer
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn archive_available(&self) -> bool {
        self.archive.is_available()
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn ingest_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> IngestResult<DocumentSummary> {
        if bytes.is_empty() {
            return Err(IngestError::EmptyUpload);
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(IngestError::TooLarge {
                size: bytes.len(),
                limit: self.max_upload_bytes,
            });
        }

        let kind = FileKind::from_file_name(file_name).ok_or_else(|| IngestError::Unsupported {
            file_name: file_name.to_string(),
        })?;
        let extractor = self
            .extractors
            .get(&kind)
            .ok_or_else(|| IngestError::Unsupported {
                file_name: file_name.to_string(),
            })?;

        let text = extractor.extract(bytes).await?;
        if text.trim().is_empty() {
            return Err(IngestError::NoText {
                file_name: file_name.to_string(),
            });
        }

        let document = NewDocument::new(file_name, kind.mime_type(), bytes.len() as u64, text);
        let indexer = Arc::clone(&self.indexer);
        let archive = Arc::clone(&self.archive);
        let receipt = tokio::task::spawn_blocking(move || {
            indexer.ingest_with(document, |doc| archive.save(doc))
        })
        .await
        .map_err(|e| IngestError::Internal(e.to_string()))??;

        let summary = receipt.summary();
        info!(
            document_id = summary.id,
            file_name = %summary.file_name,
            chunks = summary.chunk_count,
            generation = receipt.generation,
            "Document ingested"
        );
        Ok(summary)
    }

    /// Metadata of every document, ordered by id.
    pub fn list(&self) -> Vec<DocumentSummary> {
        self.indexer.corpus().summaries()
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: DocumentId) -> IngestResult<DocumentSummary> {
        let indexer = Arc::clone(&self.indexer);
        let archive = Arc::clone(&self.archive);
        let chunk_count = indexer.corpus().snapshot().chunk_count_of(id);

        let removed = tokio::task::spawn_blocking(move || {
            indexer.remove_with(id, |doc| archive.remove(doc.id))
        })
        .await
        .map_err(|e| IngestError::Internal(e.to_string()))??;

        Ok(DocumentSummary::new(&removed, chunk_count))
    }

    /// Re-installs every archived document in id order. Documents that no
    /// longer index (duplicates, empty text) are skipped with a warning.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> IngestResult<HydrationReport> {
        let indexer = Arc::clone(&self.indexer);
        let archive = Arc::clone(&self.archive);

        tokio::task::spawn_blocking(move || -> IngestResult<HydrationReport> {
            let mut report = HydrationReport::default();
            for document in archive.load_all()? {
                let id = document.id;
                match indexer.restore(document) {
                    Ok(_) => report.restored += 1,
                    Err(e @ (IndexError::Duplicate { .. } | IndexError::EmptyDocument { .. })) => {
                        warn!(document_id = id, error = %e, "Skipping archived document");
                        report.skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            info!(
                restored = report.restored,
                skipped = report.skipped,
                "Corpus hydrated from archive"
            );
            Ok(report)
        })
        .await
        .map_err(|e| IngestError::Internal(e.to_string()))?
    }
}
