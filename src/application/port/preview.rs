// SPDX-License-Identifier: MPL-2.0
//! Preview table port definition.
//!
//! A preview table is the process-wide registry that turns file bytes into a
//! locally dereferenceable URI (the browser's object-URL table, or an
//! in-process equivalent). Entries live until revoked.

use crate::domain::{PreviewHandle, StagedFile};

/// Port for the process-wide preview-handle table.
///
/// Implementations use interior mutability and clones share one table. A
/// preview manager only calls into it for the handles it requested.
pub trait PreviewTable: Clone {
    /// Registers `file` and returns a fresh handle for it.
    fn create(&self, file: &StagedFile) -> PreviewHandle;

    /// Releases a handle. Revoking an unknown handle is a no-op.
    fn revoke(&self, handle: &PreviewHandle);
}

impl<T: PreviewTable + ?Sized> PreviewTable for std::rc::Rc<T> {
    fn create(&self, file: &StagedFile) -> PreviewHandle {
        (**self).create(file)
    }

    fn revoke(&self, handle: &PreviewHandle) {
        (**self).revoke(handle);
    }
}
