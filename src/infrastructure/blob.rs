// SPDX-License-Identifier: MPL-2.0
//! Process-wide `blob:` URI table.
//!
//! Mirrors the browser's object-URL registry: each registered file gets a
//! unique `blob:part-finder/<n>` URI that can be resolved back to its bytes
//! until it is revoked. Clones share the same table.

use crate::application::port::PreviewTable;
use crate::domain::{PreviewHandle, StagedFile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

const URI_PREFIX: &str = "blob:part-finder/";

/// Shared registry of preview URIs.
#[derive(Debug, Clone, Default)]
pub struct BlobPreviewTable {
    entries: Arc<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl BlobPreviewTable {
    /// Creates an empty, independent table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the table shared by the whole process.
    #[must_use]
    pub fn global() -> Self {
        static GLOBAL: OnceLock<BlobPreviewTable> = OnceLock::new();
        GLOBAL.get_or_init(BlobPreviewTable::new).clone()
    }

    /// Resolves a URI to the bytes it previews, if it is still live.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> Option<Arc<[u8]>> {
        self.lock().get(uri).cloned()
    }

    /// Number of live entries.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        // A poisoned table still holds valid entries.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn next_uri() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("{URI_PREFIX}{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

impl PreviewTable for BlobPreviewTable {
    fn create(&self, file: &StagedFile) -> PreviewHandle {
        let uri = next_uri();
        self.lock().insert(uri.clone(), file.shared_bytes());
        PreviewHandle::new(uri)
    }

    fn revoke(&self, handle: &PreviewHandle) {
        self.lock().remove(handle.uri());
    }
}
