// SPDX-License-Identifier: MPL-2.0
//! Backend work requested by [`GallerySession::update`](super::GallerySession::update).
//!
//! A [`Task`] is inert: it only lists [`Command`]s. The runtime performs them
//! and turns each completion into a [`Message`](super::Message).

use crate::domain::{ItemId, StagedFile};
use crate::gallery::{DeleteTicket, FetchTicket, SaveRequest};

/// Why a batch of files is being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPurpose {
    /// Adding photos to the open item.
    AddImages,
    /// Creating a new item from its first photos.
    CreateItem,
}

/// One backend request (or, for uploads, one sequential batch).
#[derive(Debug, Clone)]
pub enum Command {
    LoadCatalog {
        seq: u64,
    },
    LoadRecent {
        seq: u64,
        limit: usize,
    },
    FetchImages(FetchTicket),
    DeleteImage(DeleteTicket),
    Upload {
        item_id: ItemId,
        item_name: Option<String>,
        files: Vec<StagedFile>,
        purpose: UploadPurpose,
    },
    SaveMetadata(SaveRequest),
    RemoveItem(ItemId),
    QuerySimilar {
        file: StagedFile,
        top_k: usize,
    },
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadCatalog { .. } => "load-catalog",
            Command::LoadRecent { .. } => "load-recent",
            Command::FetchImages(_) => "fetch-images",
            Command::DeleteImage(_) => "delete-image",
            Command::Upload { .. } => "upload",
            Command::SaveMetadata(_) => "save-metadata",
            Command::RemoveItem(_) => "remove-item",
            Command::QuerySimilar { .. } => "query-similar",
        }
    }
}

/// Ordered list of commands produced by one update.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Task {
    commands: Vec<Command>,
}

impl Task {
    /// A task that does nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(command: Command) -> Self {
        Self {
            commands: vec![command],
        }
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            commands: tasks.into_iter().flat_map(|task| task.commands).collect(),
        }
    }

    /// Appends `other`'s commands after this task's.
    pub fn chain(mut self, other: Task) -> Self {
        self.commands.extend(other.commands);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

impl IntoIterator for Task {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl From<Command> for Task {
    fn from(command: Command) -> Self {
        Self::single(command)
    }
}
