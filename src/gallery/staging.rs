// SPDX-License-Identifier: MPL-2.0
//! Files staged for upload, each paired with its preview.
//!
//! Every staged file owns exactly one live preview handle, kept in the same
//! position. Replacing the set, clearing it, or dropping the staging area
//! revokes all handles first, so none can leak.

use super::preview::PreviewHandleManager;
use crate::application::port::PreviewTable;
use crate::domain::{PreviewHandle, StagedFile};

#[derive(Debug)]
struct Entry {
    file: StagedFile,
    preview: PreviewHandle,
}

/// The user's current file selection for the open item.
#[derive(Debug)]
pub struct FileStagingArea<T: PreviewTable> {
    previews: PreviewHandleManager<T>,
    entries: Vec<Entry>,
}

impl<T: PreviewTable> FileStagingArea<T> {
    /// Creates an empty staging area issuing previews from `table`.
    pub fn new(table: T) -> Self {
        Self {
            previews: PreviewHandleManager::new(table),
            entries: Vec::new(),
        }
    }

    /// Replaces the staged set wholesale.
    ///
    /// Handles for the previous set are revoked before any new one is created.
    pub fn set_files(&mut self, files: Vec<StagedFile>) {
        self.release();
        self.entries = files
            .into_iter()
            .map(|file| {
                let preview = self.previews.create(&file);
                Entry { file, preview }
            })
            .collect();
        log::debug!("staged {} file(s)", self.entries.len());
    }

    /// Revokes all previews and empties the set. Returns how many files were
    /// dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.release();
        count
    }

    fn release(&mut self) {
        for entry in self.entries.drain(..) {
            self.previews.revoke(&entry.preview);
        }
    }

    /// Staged files, in selection order.
    pub fn files(&self) -> impl Iterator<Item = &StagedFile> {
        self.entries.iter().map(|entry| &entry.file)
    }

    /// Preview handles, positionally matching [`files`](Self::files).
    pub fn previews(&self) -> impl Iterator<Item = &PreviewHandle> {
        self.entries.iter().map(|entry| &entry.preview)
    }

    /// Cheap copies of the staged files (payloads are shared).
    #[must_use]
    pub fn snapshot(&self) -> Vec<StagedFile> {
        self.files().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the preview manager, for inspecting handle counts.
    #[must_use]
    pub fn preview_manager(&self) -> &PreviewHandleManager<T> {
        &self.previews
    }
}

impl<T: PreviewTable> Drop for FileStagingArea<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::BlobPreviewTable;

    fn files(names: &[&str]) -> Vec<StagedFile> {
        names
            .iter()
            .map(|name| StagedFile::new(*name, name.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn live_handles_track_latest_selection() {
        let table = BlobPreviewTable::new();
        let mut staging = FileStagingArea::new(table.clone());

        for selection in [&["a", "b", "c"][..], &["d"], &[], &["e", "f"]] {
            staging.set_files(files(selection));
            assert_eq!(staging.preview_manager().live_count(), selection.len());
            assert_eq!(table.live_count(), selection.len());
        }

        staging.clear();
        let manager = staging.preview_manager();
        assert_eq!(manager.created_count(), 6);
        assert_eq!(manager.revoked_count(), manager.created_count());
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn previews_follow_file_order() {
        let table = BlobPreviewTable::new();
        let mut staging = FileStagingArea::new(table.clone());
        staging.set_files(files(&["first", "second"]));

        let previews: Vec<&PreviewHandle> = staging.previews().collect();
        let names: Vec<&str> = staging.files().map(StagedFile::display_name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(
            table.resolve(previews[1].uri()).as_deref(),
            Some("second".as_bytes())
        );
    }

    #[test]
    fn clear_reports_dropped_count() {
        let mut staging = FileStagingArea::new(BlobPreviewTable::new());
        staging.set_files(files(&["a", "b"]));
        assert_eq!(staging.clear(), 2);
        assert!(staging.is_empty());
        assert_eq!(staging.clear(), 0);
    }

    #[test]
    fn drop_revokes_outstanding_previews() {
        let table = BlobPreviewTable::new();
        {
            let mut staging = FileStagingArea::new(table.clone());
            staging.set_files(files(&["a", "b"]));
            assert_eq!(table.live_count(), 2);
        }
        assert_eq!(table.live_count(), 0);
    }
}
