// SPDX-License-Identifier: MPL-2.0
//! Locally selected files and their preview handles.

use std::fmt;
use std::sync::Arc;

/// A file the user picked for upload but that has not been sent yet.
///
/// The bytes are shared, so cloning a staged file (e.g. to hand it to an
/// upload command) does not copy the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedFile {
    bytes: Arc<[u8]>,
    display_name: String,
}

impl StagedFile {
    /// Creates a staged file from its contents and display name.
    pub fn new(display_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            display_name: display_name.into(),
        }
    }

    /// Returns the raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a shared handle to the contents.
    #[must_use]
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Returns the name shown to the user and sent as the multipart filename.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("display_name", &self.display_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Transient, locally dereferenceable URI rendering a [`StagedFile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    /// Wraps a URI issued by a preview table.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Returns the URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_payload() {
        let file = StagedFile::new("a.jpg", vec![1u8, 2, 3]);
        let copy = file.clone();
        assert!(Arc::ptr_eq(&file.shared_bytes(), &copy.shared_bytes()));
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn debug_omits_payload() {
        let file = StagedFile::new("a.jpg", vec![0u8; 1024]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("a.jpg"));
        assert!(rendered.contains("1024"));
    }
}
