// SPDX-License-Identifier: MPL-2.0
//! Single-task executor for session commands.
//!
//! Every command becomes a future polled from one [`FuturesUnordered`].
//! Completions are fed back into the session in the order they finish, and
//! any follow-up commands join the same set. Nothing is spawned, so backend
//! futures need not be `Send` and session state is only ever touched between
//! polls.

use super::message::Message;
use super::session::GallerySession;
use super::task::{Command, Task};
use crate::application::port::{Backend, PreviewTable};
use crate::gallery::upload_all;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use std::rc::Rc;

/// Runs commands against a backend and routes completions to a session.
pub struct Runtime<B: Backend + 'static> {
    backend: Rc<B>,
    pending: FuturesUnordered<LocalBoxFuture<'static, Message>>,
}

impl<B: Backend + 'static> std::fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("in_flight", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<B: Backend + 'static> Runtime<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Rc::new(backend),
            pending: FuturesUnordered::new(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of commands still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hands `message` to the session and queues the resulting commands.
    ///
    /// Does not wait for anything; see [`step`](Self::step) and
    /// [`run_until_idle`](Self::run_until_idle).
    pub fn dispatch<T: PreviewTable>(&mut self, session: &mut GallerySession<T>, message: Message) {
        let task = session.update(message);
        self.submit(task);
    }

    /// Queues the commands of `task`.
    pub fn submit(&mut self, task: Task) {
        for command in task {
            log::debug!("dispatching {}", command.name());
            let backend = Rc::clone(&self.backend);
            self.pending
                .push(async move { execute(backend.as_ref(), command).await }.boxed_local());
        }
    }

    /// Waits for the next command to finish and applies its completion.
    ///
    /// Returns `false` if nothing was running.
    pub async fn step<T: PreviewTable>(&mut self, session: &mut GallerySession<T>) -> bool {
        match self.pending.next().await {
            Some(completion) => {
                self.dispatch(session, completion);
                true
            }
            None => false,
        }
    }

    /// Applies completions until no command is left running, including any
    /// follow-ups they trigger. Returns how many completions were applied.
    pub async fn run_until_idle<T: PreviewTable>(
        &mut self,
        session: &mut GallerySession<T>,
    ) -> usize {
        let mut applied = 0;
        while self.step(session).await {
            applied += 1;
        }
        applied
    }

    /// Dispatches each message in turn, then runs until idle.
    pub async fn dispatch_all<T: PreviewTable>(
        &mut self,
        session: &mut GallerySession<T>,
        messages: impl IntoIterator<Item = Message>,
    ) -> usize {
        for message in messages {
            self.dispatch(session, message);
        }
        self.run_until_idle(session).await
    }
}

/// Performs one command and describes its completion.
pub async fn execute<B: Backend>(backend: &B, command: Command) -> Message {
    match command {
        Command::LoadCatalog { seq } => Message::CatalogLoaded {
            seq,
            result: backend.list_items().await,
        },
        Command::LoadRecent { seq, limit } => Message::RecentLoaded {
            seq,
            result: backend.recent_items(limit).await,
        },
        Command::FetchImages(ticket) => {
            let result = backend.item_images(&ticket.item_id).await;
            Message::ImagesFetched { ticket, result }
        }
        Command::DeleteImage(ticket) => {
            let result = backend
                .delete_image(&ticket.item_id, &ticket.filename)
                .await;
            Message::ImageDeleted { ticket, result }
        }
        Command::Upload {
            item_id,
            item_name,
            files,
            purpose,
        } => {
            let outcome = upload_all(backend, &item_id, item_name.as_deref(), &files).await;
            Message::UploadFinished {
                item_id,
                item_name,
                outcome,
                purpose,
            }
        }
        Command::SaveMetadata(request) => {
            let result = backend
                .update_metadata(&request.item_id, &request.text)
                .await;
            Message::MetadataSaved {
                item_id: request.item_id,
                result,
            }
        }
        Command::RemoveItem(item_id) => {
            let result = backend.delete_item(&item_id).await;
            Message::ItemRemoved { item_id, result }
        }
        Command::QuerySimilar { file, top_k } => {
            Message::QueryFinished(backend.query_similar(&file, top_k).await)
        }
    }
}
