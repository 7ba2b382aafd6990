// SPDX-License-Identifier: MPL-2.0
//! The gallery session: every component, one update entry point.
//!
//! [`GallerySession::update`] is synchronous. It mutates state, pushes
//! notifications, publishes [`Event`]s, and returns a [`Task`] describing the
//! backend requests to make. Completions come back as [`Message`]s, so any
//! interleaving of user intents and completions goes through the same path.

use super::config::Config;
use super::message::Message;
use super::task::{Command, Task, UploadPurpose};
use crate::application::port::{ApiError, PreviewTable};
use crate::domain::{ImageRef, Item, ItemId, SimilarityMatch, UploadOutcome};
use crate::gallery::{
    route, CatalogView, ConfirmationToken, FetchApplied, FileStagingArea, ImageGalleryController,
    ItemCatalogStore, MetadataEditor, RemovalTracker, RouteModalBinder, RouteScheme,
    UploadOrchestrator,
};
use crate::i18n::REASON_ARG;
use crate::infrastructure::BlobPreviewTable;
use crate::notifications::{self, Notification, NotificationId};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 64;

/// Something observers may want to re-render for.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CatalogChanged,
    RecentChanged,
    /// The address changed.
    RouteChanged {
        address: String,
        selected: Option<ItemId>,
    },
    /// The item's images were requested; its detail view is now visible.
    ItemActivated(ItemId),
    /// The item's detail view went away and its resources were released.
    ItemDeactivated(ItemId),
    ImagesChanged(ItemId),
    StagingChanged {
        count: usize,
    },
    /// Files staged for a new item changed.
    DraftChanged {
        count: usize,
    },
    UploadFinished {
        item_id: ItemId,
        outcome: UploadOutcome,
    },
    MetadataSaved(ItemId),
    /// Removal of the item awaits confirmation with this token.
    RemovalRequested(ConfirmationToken),
    ItemRemoved(ItemId),
    MatchesChanged,
    Notified(NotificationId),
}

/// Tunables the session reads from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub recent_limit: usize,
    pub top_k: usize,
    pub scheme: RouteScheme,
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            recent_limit: config.recent_limit(),
            top_k: config.top_k(),
            scheme: config.routing.scheme,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Generates an id for a new item: 8 lowercase hex characters.
#[must_use]
pub fn generate_item_id() -> ItemId {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    let hex = hasher.finalize().to_hex();
    ItemId::new(&hex.as_str()[..8])
}

/// Root state of one gallery view.
pub struct GallerySession<T: PreviewTable = BlobPreviewTable> {
    settings: SessionSettings,
    catalog: ItemCatalogStore,
    route: RouteModalBinder,
    images: ImageGalleryController,
    staging: FileStagingArea<T>,
    /// Files picked for a new item, before it exists.
    draft: FileStagingArea<T>,
    uploads: UploadOrchestrator,
    metadata: MetadataEditor,
    removal: RemovalTracker,
    matches: Vec<SimilarityMatch>,
    querying: bool,
    notifications: notifications::Manager,
    events: broadcast::Sender<Event>,
}

impl<T: PreviewTable> std::fmt::Debug for GallerySession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySession")
            .field("address", &self.route.address())
            .field("active", &self.route.active_id())
            .field("items", &self.catalog.items().len())
            .field("images", &self.images.images().len())
            .field("staged", &self.staging.len())
            .finish_non_exhaustive()
    }
}

impl<T: PreviewTable> GallerySession<T> {
    /// Creates a session starting at `address`, issuing previews from `table`.
    ///
    /// Nothing is loaded until [`Message::Mount`].
    pub fn new(settings: SessionSettings, address: impl Into<String>, table: T) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            settings,
            catalog: ItemCatalogStore::new(),
            route: RouteModalBinder::new(settings.scheme, address),
            images: ImageGalleryController::new(),
            staging: FileStagingArea::new(table.clone()),
            draft: FileStagingArea::new(table),
            uploads: UploadOrchestrator::new(),
            metadata: MetadataEditor::new(),
            removal: RemovalTracker::new(),
            matches: Vec::new(),
            querying: false,
            notifications: notifications::Manager::new(),
            events,
        }
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Handles one message and returns the backend work it calls for.
    pub fn update(&mut self, message: Message) -> Task {
        match message {
            // ═══════════════════════════════════════════════════════════════
            // LIFECYCLE
            // ═══════════════════════════════════════════════════════════════
            Message::Mount => {
                self.route.mount();
                self.emit_route();
                self.load_catalog().chain(self.load_recent())
            }
            Message::Unmount => {
                if let Some(id) = self.route.active_id().cloned() {
                    self.release(id);
                }
                if self.draft.clear() > 0 {
                    self.emit_draft();
                }
                self.route.mount();
                Task::none()
            }

            // ═══════════════════════════════════════════════════════════════
            // NAVIGATION
            // ═══════════════════════════════════════════════════════════════
            Message::Select(id) => {
                let effect = self.route.select(&id);
                self.after_route_change(effect)
            }
            Message::Close => {
                let effect = self.route.close();
                self.after_route_change(effect)
            }
            Message::Back => match self.route.back() {
                Some(effect) => self.after_route_change(effect),
                None => Task::none(),
            },
            Message::Forward => match self.route.forward() {
                Some(effect) => self.after_route_change(effect),
                None => Task::none(),
            },
            Message::Navigate(address) => {
                let effect = self.route.navigate(address);
                self.after_route_change(effect)
            }

            // ═══════════════════════════════════════════════════════════════
            // CATALOG
            // ═══════════════════════════════════════════════════════════════
            Message::Refresh => self.load_catalog(),
            Message::LoadRecent => self.load_recent(),
            Message::CatalogLoaded { seq, result } => {
                if self.catalog.apply_load_all(seq, result) {
                    self.emit(Event::CatalogChanged);
                    self.drop_hidden_staging();
                }
                self.activate_if_resolved()
            }
            Message::RecentLoaded { seq, result } => {
                if self.catalog.apply_load_recent(seq, result) {
                    self.emit(Event::RecentChanged);
                }
                Task::none()
            }

            // ═══════════════════════════════════════════════════════════════
            // IMAGES
            // ═══════════════════════════════════════════════════════════════
            Message::ImagesFetched { ticket, result } => {
                if self.images.apply_fetch(&ticket, result) != FetchApplied::Discarded {
                    self.emit(Event::ImagesChanged(ticket.item_id));
                }
                Task::none()
            }
            Message::DeleteImage(image) => {
                let Some(id) = self.visible_id() else {
                    return Task::none();
                };
                match self.images.begin_delete(&id, &image) {
                    Some(ticket) => Task::single(Command::DeleteImage(ticket)),
                    None => Task::none(),
                }
            }
            Message::ImageDeleted { ticket, result } => {
                let removed = self.images.apply_delete(&ticket, &result);
                match result {
                    Ok(()) => {
                        log::info!("deleted image {} of {}", ticket.filename, ticket.item_id);
                        self.notify(
                            Notification::success("notification-delete-image-success")
                                .with_arg("filename", &ticket.filename),
                        );
                        if removed > 0 {
                            self.emit(Event::ImagesChanged(ticket.item_id));
                        }
                    }
                    Err(err) => {
                        log::error!("deleting {} failed: {}", ticket.filename, err);
                        self.notify_failure("notification-delete-image-failed", &err, |n| {
                            n.with_arg("filename", &ticket.filename)
                        });
                    }
                }
                Task::none()
            }

            // ═══════════════════════════════════════════════════════════════
            // STAGING & UPLOAD
            // ═══════════════════════════════════════════════════════════════
            Message::FilesSelected(files) => {
                if self.visible_id().is_none() {
                    self.notify(Notification::warning("notification-no-item-open"));
                    return Task::none();
                }
                self.staging.set_files(files);
                self.emit_staging();
                Task::none()
            }
            Message::ClearFiles => {
                self.staging.clear();
                self.emit_staging();
                Task::none()
            }
            Message::Upload => self.start_upload(),
            Message::DraftFilesSelected(files) => {
                self.draft.set_files(files);
                self.emit_draft();
                Task::none()
            }
            Message::ClearDraft => {
                self.draft.clear();
                self.emit_draft();
                Task::none()
            }
            Message::CreateItem { name } => self.start_create(&name),
            Message::UploadFinished {
                item_id,
                item_name,
                outcome,
                purpose,
            } => self.finish_upload(item_id, item_name, outcome, purpose),

            // ═══════════════════════════════════════════════════════════════
            // METADATA
            // ═══════════════════════════════════════════════════════════════
            Message::MetadataEdited(text) => {
                self.metadata.edit(text);
                Task::none()
            }
            Message::SaveMetadata => match self.metadata.begin_save() {
                Some(request) => Task::single(Command::SaveMetadata(request)),
                None => Task::none(),
            },
            Message::MetadataSaved { item_id, result } => {
                self.metadata.apply_save(&item_id, &result);
                match result {
                    Ok(()) => {
                        log::info!("saved metadata of {item_id}");
                        self.notify(Notification::success("notification-metadata-saved"));
                        self.emit(Event::MetadataSaved(item_id));
                        self.load_catalog()
                    }
                    Err(err) => {
                        log::error!("saving metadata of {item_id} failed: {err}");
                        self.notify_failure("notification-metadata-save-failed", &err, |n| n);
                        Task::none()
                    }
                }
            }

            // ═══════════════════════════════════════════════════════════════
            // REMOVAL
            // ═══════════════════════════════════════════════════════════════
            Message::RequestRemoval(id) => {
                let token = self.removal.request(&id);
                self.emit(Event::RemovalRequested(token));
                Task::none()
            }
            Message::ConfirmRemoval(token) => match self.removal.confirm(&token) {
                Some(id) => Task::single(Command::RemoveItem(id)),
                None => Task::none(),
            },
            Message::CancelRemoval => {
                self.removal.cancel();
                Task::none()
            }
            Message::ItemRemoved { item_id, result } => {
                self.removal.finish(&item_id);
                match result {
                    Ok(()) => self.finish_removal(item_id),
                    Err(err) => {
                        log::error!("removing {item_id} failed: {err}");
                        self.notify_failure("notification-item-remove-failed", &err, |n| {
                            n.with_arg("id", item_id.as_str())
                        });
                        Task::none()
                    }
                }
            }

            // ═══════════════════════════════════════════════════════════════
            // SIMILARITY QUERY
            // ═══════════════════════════════════════════════════════════════
            Message::QuerySimilar(None) => {
                self.notify(Notification::warning("notification-query-no-file"));
                Task::none()
            }
            Message::QuerySimilar(Some(file)) => {
                self.querying = true;
                Task::single(Command::QuerySimilar {
                    file,
                    top_k: self.settings.top_k,
                })
            }
            Message::QueryFinished(result) => {
                self.querying = false;
                match result {
                    Ok(matches) => {
                        self.notify(
                            Notification::info("notification-query-results")
                                .with_arg("count", matches.len()),
                        );
                        self.matches = matches;
                    }
                    Err(err) => {
                        self.matches.clear();
                        self.notify_failure("notification-query-failed", &err, |n| n);
                    }
                }
                self.emit(Event::MatchesChanged);
                Task::none()
            }

        }
    }

    // =========================================================================
    // Route handling
    // =========================================================================

    fn after_route_change(&mut self, effect: route::Effect) -> Task {
        if let route::Effect::Deactivated(id) = effect {
            self.release(id);
        }
        self.emit_route();
        self.activate_if_resolved()
    }

    /// Drops everything tied to the item that was open.
    fn release(&mut self, id: ItemId) {
        let dropped = self.staging.clear();
        self.images.close();
        self.metadata.reset();
        log::debug!("released {id} ({dropped} staged file(s))");
        self.emit(Event::ItemDeactivated(id));
        if dropped > 0 {
            self.emit_staging();
        }
    }

    fn activate_if_resolved(&mut self) -> Task {
        let Some(id) = self.route.reconcile(&self.catalog) else {
            return Task::none();
        };
        let ticket = self.images.open(&id);
        self.metadata.sync_to(self.catalog.resolve(&id));
        self.emit(Event::ItemActivated(id));
        Task::single(Command::FetchImages(ticket))
    }

    /// Id of the open item while its detail view is showing.
    fn visible_id(&self) -> Option<ItemId> {
        if !self.is_detail_visible() {
            return None;
        }
        self.route.active_id().cloned()
    }

    /// Staged files belong to a visible detail view. Once the open item no
    /// longer resolves in the catalog, its previews go.
    fn drop_hidden_staging(&mut self) {
        if self.route.active_id().is_some() && !self.is_detail_visible() {
            let dropped = self.staging.clear();
            if dropped > 0 {
                log::debug!("released {dropped} staged file(s) of a hidden item");
                self.emit_staging();
            }
        }
    }

    // =========================================================================
    // Catalog helpers
    // =========================================================================

    fn load_catalog(&mut self) -> Task {
        Task::single(Command::LoadCatalog {
            seq: self.catalog.begin_load_all(),
        })
    }

    fn load_recent(&mut self) -> Task {
        Task::single(Command::LoadRecent {
            seq: self.catalog.begin_load_recent(),
            limit: self.settings.recent_limit,
        })
    }

    // =========================================================================
    // Upload helpers
    // =========================================================================

    fn start_upload(&mut self) -> Task {
        let Some(id) = self.visible_id() else {
            self.notify(Notification::warning("notification-no-item-open"));
            return Task::none();
        };
        if self.staging.is_empty() {
            self.notify(Notification::warning("notification-upload-empty"));
            return Task::none();
        }
        if !self.uploads.begin(&id) {
            self.notify(Notification::warning("notification-upload-busy"));
            return Task::none();
        }
        Task::single(Command::Upload {
            item_id: id,
            item_name: None,
            files: self.staging.snapshot(),
            purpose: UploadPurpose::AddImages,
        })
    }

    fn start_create(&mut self, name: &str) -> Task {
        let files = self.draft.snapshot();
        if files.is_empty() {
            self.notify(Notification::warning("notification-create-no-files"));
            return Task::none();
        }
        let id = generate_item_id();
        let name = match name.trim() {
            "" => id.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.uploads.begin(&id);
        log::info!("creating item {id} ({name}) with {} file(s)", files.len());
        Task::single(Command::Upload {
            item_id: id,
            item_name: Some(name),
            files,
            purpose: UploadPurpose::CreateItem,
        })
    }

    fn finish_upload(
        &mut self,
        item_id: ItemId,
        item_name: Option<String>,
        outcome: UploadOutcome,
        purpose: UploadPurpose,
    ) -> Task {
        self.uploads.finish(&item_id);
        self.emit(Event::UploadFinished {
            item_id: item_id.clone(),
            outcome,
        });

        match purpose {
            UploadPurpose::AddImages => {
                self.notify_upload(outcome);
                let mut task = if outcome.succeeded > 0 {
                    self.load_catalog()
                } else {
                    Task::none()
                };
                if self.route.active_id() == Some(&item_id) {
                    self.staging.clear();
                    self.emit_staging();
                    let ticket = self.images.open(&item_id);
                    task = task.chain(Task::single(Command::FetchImages(ticket)));
                }
                task
            }
            UploadPurpose::CreateItem if outcome.succeeded == 0 => {
                self.notify(
                    Notification::error("notification-upload-failed")
                        .with_arg("total", outcome.attempted()),
                );
                Task::none()
            }
            UploadPurpose::CreateItem => {
                if outcome.is_partial() {
                    self.notify_upload(outcome);
                }
                self.draft.clear();
                self.emit_draft();
                self.notify(
                    Notification::success("notification-item-created")
                        .with_arg("name", item_name.unwrap_or_else(|| item_id.to_string())),
                );
                let effect = self.route.select(&item_id);
                if let route::Effect::Deactivated(id) = effect {
                    self.release(id);
                }
                self.emit_route();
                self.load_catalog()
            }
        }
    }

    fn notify_upload(&mut self, outcome: UploadOutcome) {
        let notification = if outcome.all_succeeded() {
            Notification::success("notification-upload-success")
                .with_arg("count", outcome.succeeded)
        } else if outcome.succeeded == 0 {
            Notification::error("notification-upload-failed").with_arg("total", outcome.failed)
        } else {
            Notification::warning("notification-upload-partial")
                .with_arg("failed", outcome.failed)
                .with_arg("total", outcome.attempted())
        };
        self.notify(notification);
    }

    // =========================================================================
    // Removal helpers
    // =========================================================================

    fn finish_removal(&mut self, item_id: ItemId) -> Task {
        let name = self
            .catalog
            .resolve(&item_id)
            .map_or_else(|| item_id.to_string(), |item| item.display_name.clone());
        log::info!("removed item {item_id}");

        if self.route.selected_id() == Some(&item_id) {
            let effect = self.route.close();
            if let route::Effect::Deactivated(id) = effect {
                self.release(id);
            }
            self.images.close();
            self.staging.clear();
            self.emit_route();
        }

        self.notify(Notification::success("notification-item-removed").with_arg("name", name));
        self.emit(Event::ItemRemoved(item_id));
        self.load_catalog()
    }

    // =========================================================================
    // Notifications & events
    // =========================================================================

    /// Pushes a notification and announces it.
    pub fn notify(&mut self, notification: Notification) {
        let id = notification.id();
        self.notifications.push(notification);
        self.emit(Event::Notified(id));
    }

    fn notify_failure(
        &mut self,
        key: &str,
        err: &ApiError,
        decorate: impl FnOnce(Notification) -> Notification,
    ) {
        let notification = Notification::error(key).with_arg(REASON_ARG, err.i18n_key());
        self.notify(decorate(notification));
    }

    fn emit(&self, event: Event) {
        // No subscriber is fine.
        let _ = self.events.send(event);
    }

    fn emit_route(&self) {
        self.emit(Event::RouteChanged {
            address: self.route.address().to_string(),
            selected: self.route.selected_id().cloned(),
        });
    }

    fn emit_staging(&self) {
        self.emit(Event::StagingChanged {
            count: self.staging.len(),
        });
    }

    fn emit_draft(&self) {
        self.emit(Event::DraftChanged {
            count: self.draft.len(),
        });
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.catalog.items()
    }

    #[must_use]
    pub fn recent(&self) -> &[Item] {
        self.catalog.recent()
    }

    #[must_use]
    pub fn catalog(&self) -> &ItemCatalogStore {
        &self.catalog
    }

    #[must_use]
    pub fn is_loading_catalog(&self) -> bool {
        self.catalog.is_loading(CatalogView::All)
    }

    #[must_use]
    pub fn address(&self) -> &str {
        self.route.address()
    }

    #[must_use]
    pub fn route(&self) -> &RouteModalBinder {
        &self.route
    }

    /// Id in the address, resolved or not.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ItemId> {
        self.route.selected_id()
    }

    /// Whether the detail view is showing.
    #[must_use]
    pub fn is_detail_visible(&self) -> bool {
        self.route.is_visible(&self.catalog)
    }

    /// The item whose detail view is showing.
    #[must_use]
    pub fn active_item(&self) -> Option<&Item> {
        if !self.is_detail_visible() {
            return None;
        }
        self.route
            .active_id()
            .and_then(|id| self.catalog.resolve(id))
    }

    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        self.images.images()
    }

    #[must_use]
    pub fn is_loading_images(&self) -> bool {
        self.images.is_loading()
    }

    #[must_use]
    pub fn staging(&self) -> &FileStagingArea<T> {
        &self.staging
    }

    /// Files staged for a new item.
    #[must_use]
    pub fn draft(&self) -> &FileStagingArea<T> {
        &self.draft
    }

    #[must_use]
    pub fn is_uploading(&self, item_id: &ItemId) -> bool {
        self.uploads.is_uploading(item_id)
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataEditor {
        &self.metadata
    }

    #[must_use]
    pub fn pending_removal(&self) -> Option<&ConfirmationToken> {
        self.removal.pending()
    }

    #[must_use]
    pub fn is_removing(&self, item_id: &ItemId) -> bool {
        self.removal.is_removing(item_id)
    }

    #[must_use]
    pub fn matches(&self) -> &[SimilarityMatch] {
        &self.matches
    }

    #[must_use]
    pub fn is_querying(&self) -> bool {
        self.querying
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }
}
