// SPDX-License-Identifier: MPL-2.0
//! Preview handle bookkeeping.
//!
//! The manager is the sole owner of the handles it asks the preview table
//! for. It only ever revokes handles it created, and each of them exactly
//! once; a second revoke of the same handle is a no-op.

use crate::application::port::PreviewTable;
use crate::domain::{PreviewHandle, StagedFile};
use std::collections::HashSet;

/// Creates and revokes preview handles against a [`PreviewTable`].
#[derive(Debug)]
pub struct PreviewHandleManager<T: PreviewTable> {
    table: T,
    live: HashSet<PreviewHandle>,
    created: usize,
    revoked: usize,
}

impl<T: PreviewTable> PreviewHandleManager<T> {
    /// Creates a manager issuing handles from `table`.
    pub fn new(table: T) -> Self {
        Self {
            table,
            live: HashSet::new(),
            created: 0,
            revoked: 0,
        }
    }

    /// Registers `file` and returns its preview handle.
    pub fn create(&mut self, file: &StagedFile) -> PreviewHandle {
        let handle = self.table.create(file);
        log::debug!("preview {} created for {}", handle, file.display_name());
        self.live.insert(handle.clone());
        self.created += 1;
        handle
    }

    /// Revokes a handle this manager created.
    ///
    /// Returns `false` (and does nothing) for handles that are unknown or
    /// were already revoked.
    pub fn revoke(&mut self, handle: &PreviewHandle) -> bool {
        if !self.live.remove(handle) {
            return false;
        }
        self.table.revoke(handle);
        self.revoked += 1;
        log::debug!("preview {handle} revoked");
        true
    }

    /// Revokes every live handle. Returns how many were revoked.
    pub fn revoke_all(&mut self) -> usize {
        let handles: Vec<PreviewHandle> = self.live.drain().collect();
        for handle in &handles {
            self.table.revoke(handle);
        }
        self.revoked += handles.len();
        handles.len()
    }

    /// Returns whether `handle` is live and owned by this manager.
    #[must_use]
    pub fn owns(&self, handle: &PreviewHandle) -> bool {
        self.live.contains(handle)
    }

    /// Number of handles created so far.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Number of handles revoked so far.
    #[must_use]
    pub fn revoked_count(&self) -> usize {
        self.revoked
    }

    /// Number of handles currently live.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Returns the underlying table.
    #[must_use]
    pub fn table(&self) -> &T {
        &self.table
    }
}
