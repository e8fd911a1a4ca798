use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::{DocumentArchive, StorageError, StorageResult};
use crate::corpus::{Document, DocumentId};

/// In-memory archive for tests. Can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    documents: Mutex<BTreeMap<DocumentId, Document>>,
    fail_writes: AtomicBool,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let archive = Self::new();
        archive
            .documents
            .lock()
            .extend(documents.into_iter().map(|d| (d.id, d)));
        archive
    }

    /// Makes subsequent `save` and `remove` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.lock().contains_key(&id)
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory archive is read-only".into()));
        }
        Ok(())
    }
}

impl DocumentArchive for MemoryArchive {
    fn save(&self, document: &Document) -> StorageResult<()> {
        self.check_writable()?;
        self.documents.lock().insert(document.id, document.clone());
        Ok(())
    }

    fn remove(&self, id: DocumentId) -> StorageResult<()> {
        self.check_writable()?;
        self.documents.lock().remove(&id);
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<Document>> {
        Ok(self.documents.lock().values().cloned().collect())
    }

    fn is_available(&self) -> bool {
        !self.fail_writes.load(Ordering::SeqCst)
    }
}
