use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{DocumentArchive, StorageError, StorageResult};
use crate::corpus::{Document, DocumentId};

const JSON_EXTENSION: &str = "json";

const TEMP_EXTENSION: &str = "json.tmp";

/// One JSON file per document under `<storage_path>/documents/`.
///
/// Writes go to a temporary file that is synced and then renamed into place,
/// so a crash never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct FsDocumentArchive {
    root: PathBuf,
}

impl FsDocumentArchive {
    pub fn new(storage_path: impl AsRef<Path>) -> Self {
        Self {
            root: storage_path.as_ref().join("documents"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_root(&self) -> StorageResult<()> {
        if !self.root.is_dir() {
            fs::create_dir_all(&self.root).map_err(|_| StorageError::DirectoryUnavailable {
                path: self.root.clone(),
            })?;
        }
        Ok(())
    }

    fn document_path(&self, id: DocumentId) -> PathBuf {
        self.root.join(format!("{:016}.{}", id, JSON_EXTENSION))
    }

    fn temp_path(&self, id: DocumentId) -> PathBuf {
        self.root.join(format!("{:016}.{}", id, TEMP_EXTENSION))
    }
}

impl DocumentArchive for FsDocumentArchive {
    fn save(&self, document: &Document) -> StorageResult<()> {
        self.ensure_root()?;

        let bytes = serde_json::to_vec(document).map_err(|source| StorageError::Encode {
            id: document.id,
            source,
        })?;

        let temp_path = self.temp_path(document.id);
        let final_path = self.document_path(document.id);

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &final_path)?;

        debug!(path = %final_path.display(), "Document archived");
        Ok(())
    }

    fn remove(&self, id: DocumentId) -> StorageResult<()> {
        match fs::remove_file(self.document_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load_all(&self) -> StorageResult<Vec<Document>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }

            let parsed = fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    serde_json::from_slice::<Document>(&bytes).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(document) => documents.push(document),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }

        documents.sort_by_key(|d| d.id);
        Ok(documents)
    }

    fn is_available(&self) -> bool {
        self.ensure_root().is_ok()
    }
}
