// SPDX-License-Identifier: MPL-2.0
//! Aggregate result of a multi-file upload.

/// Counts of files that were and were not accepted by the backend.
///
/// Failures are not itemized: callers only learn how many went wrong and
/// re-fetch the gallery to see what actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadOutcome {
    /// Files the backend accepted.
    pub succeeded: usize,
    /// Files whose request failed.
    pub failed: usize,
}

impl UploadOutcome {
    /// Total number of files attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Returns `true` only if every attempted file succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Returns `true` if at least one file succeeded and at least one failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }
}
