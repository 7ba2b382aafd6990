// SPDX-License-Identifier: MPL-2.0
//! Stored image references.

use std::fmt;

/// Opaque reference (usually a signed URL) to one stored image of an item.
///
/// The backend identifies an image by its bare filename, so deletes must go
/// through [`ImageRef::filename`] while list bookkeeping keeps comparing the
/// full original reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wraps a raw reference.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the full reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the bare filename: everything after the last `/`, cut at the
    /// first `?` that follows it.
    #[must_use]
    pub fn filename(&self) -> &str {
        let tail = self.0.rsplit('/').next().unwrap_or(&self.0);
        tail.split('?').next().unwrap_or(tail)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ImageRef {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
