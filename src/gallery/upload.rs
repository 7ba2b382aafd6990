// SPDX-License-Identifier: MPL-2.0
//! Sequential multi-file upload.
//!
//! Files go out one at a time, in order. A failed file is counted and the
//! loop moves on; the caller only sees the aggregate [`UploadOutcome`].

use crate::application::port::Backend;
use crate::domain::{ItemId, StagedFile, UploadOutcome};
use std::collections::HashSet;

/// Tracks which items have an upload batch in flight.
#[derive(Debug, Default)]
pub struct UploadOrchestrator {
    in_flight: HashSet<ItemId>,
}

impl UploadOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a batch for `item_id` as started.
    ///
    /// Returns `false` if one is already running for that item.
    pub fn begin(&mut self, item_id: &ItemId) -> bool {
        self.in_flight.insert(item_id.clone())
    }

    /// Marks the batch for `item_id` as done.
    pub fn finish(&mut self, item_id: &ItemId) {
        self.in_flight.remove(item_id);
    }

    #[must_use]
    pub fn is_uploading(&self, item_id: &ItemId) -> bool {
        self.in_flight.contains(item_id)
    }

    #[must_use]
    pub fn any_uploading(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

/// Uploads `files` for `item_id`, one request per file.
pub async fn upload_all<B: Backend>(
    backend: &B,
    item_id: &ItemId,
    item_name: Option<&str>,
    files: &[StagedFile],
) -> UploadOutcome {
    let mut outcome = UploadOutcome::default();

    for file in files {
        match backend.upload_image(item_id, item_name, file).await {
            Ok(()) => outcome.succeeded += 1,
            Err(err) => {
                log::warn!(
                    "upload of {} to item {} failed: {}",
                    file.display_name(),
                    item_id,
                    err
                );
                outcome.failed += 1;
            }
        }
    }

    log::info!(
        "uploaded {}/{} file(s) to item {}",
        outcome.succeeded,
        outcome.attempted(),
        item_id
    );
    outcome
}
