//! Image blob capability
//!
//! Prize images live outside the JSON store (IndexedDB in the browser). The
//! engine only stores the id and asks the blob store to save/drop bytes.

use std::collections::HashMap;

pub trait BlobStore {
    fn save(&mut self, id: &str, blob: Vec<u8>);
    fn read(&self, id: &str) -> Option<Vec<u8>>;
    fn delete(&mut self, id: &str);
}

/// In-memory blob store
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn save(&mut self, id: &str, blob: Vec<u8>) {
        self.blobs.insert(id.to_string(), blob);
    }

    fn read(&self, id: &str) -> Option<Vec<u8>> {
        self.blobs.get(id).cloned()
    }

    fn delete(&mut self, id: &str) {
        self.blobs.remove(id);
    }
}
