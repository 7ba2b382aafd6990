// SPDX-License-Identifier: MPL-2.0
//! Scripted backend shared by the integration tests.
//!
//! Every call is recorded. Delays go through `tokio::time::sleep`, so tests
//! run with `start_paused = true` and control completion order exactly.

#![allow(dead_code)]

use part_finder::application::port::{ApiError, ApiResult, Backend};
use part_finder::domain::{ImageRef, Item, ItemId, SimilarityMatch, StagedFile};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListItems,
    RecentItems(usize),
    ItemImages(ItemId),
    Upload(ItemId, String),
    DeleteImage(ItemId, String),
    DeleteItem(ItemId),
    UpdateMetadata(ItemId, String),
    QuerySimilar(String),
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    items: RefCell<Vec<Item>>,
    images: RefCell<HashMap<ItemId, Vec<ImageRef>>>,
    fetch_script: RefCell<HashMap<ItemId, VecDeque<(Duration, Vec<ImageRef>)>>>,
    failing_uploads: RefCell<HashSet<String>>,
    delays: RefCell<HashMap<&'static str, Duration>>,
    listing_fails: Cell<bool>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item with the given image references.
    pub fn with_item(self, id: &str, images: &[&str]) -> Self {
        let id = ItemId::new(id);
        self.items
            .borrow_mut()
            .push(Item::new(id.clone(), id.as_str().to_uppercase()));
        self.images
            .borrow_mut()
            .insert(id, images.iter().map(|raw| ImageRef::new(*raw)).collect());
        self
    }

    /// Uploads of this filename are rejected.
    pub fn failing_upload(self, filename: &str) -> Self {
        self.failing_uploads.borrow_mut().insert(filename.to_string());
        self
    }

    /// Every call of `op` sleeps this long before answering.
    pub fn delay(self, op: &'static str, by: Duration) -> Self {
        self.delays.borrow_mut().insert(op, by);
        self
    }

    /// The next `item_images` call for `id` answers `images` after `after`.
    /// Scripted answers are used up in order; then the stored list is served.
    pub fn script_fetch(self, id: &str, after: Duration, images: &[&str]) -> Self {
        self.fetch_script
            .borrow_mut()
            .entry(ItemId::new(id))
            .or_default()
            .push_back((after, images.iter().map(|raw| ImageRef::new(*raw)).collect()));
        self
    }

    /// From now on `list_items` answers with a transport error.
    pub fn fail_listing(&self) {
        self.listing_fails.set(true);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| pred(*call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    async fn pause(&self, op: &'static str) {
        let delay = self.delays.borrow().get(op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Backend for ScriptedBackend {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.record(Call::ListItems);
        self.pause("list_items").await;
        if self.listing_fails.get() {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(self.items.borrow().clone())
    }

    async fn recent_items(&self, limit: usize) -> ApiResult<Vec<Item>> {
        self.record(Call::RecentItems(limit));
        self.pause("recent_items").await;
        Ok(self.items.borrow().iter().rev().take(limit).cloned().collect())
    }

    async fn item_images(&self, item_id: &ItemId) -> ApiResult<Vec<ImageRef>> {
        self.record(Call::ItemImages(item_id.clone()));
        let scripted = self
            .fetch_script
            .borrow_mut()
            .get_mut(item_id)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some((after, images)) => {
                tokio::time::sleep(after).await;
                Ok(images)
            }
            None => {
                self.pause("item_images").await;
                Ok(self
                    .images
                    .borrow()
                    .get(item_id)
                    .cloned()
                    .unwrap_or_default())
            }
        }
    }

    async fn upload_image(
        &self,
        item_id: &ItemId,
        item_name: Option<&str>,
        file: &StagedFile,
    ) -> ApiResult<()> {
        self.record(Call::Upload(item_id.clone(), file.display_name().to_string()));
        self.pause("upload_image").await;
        if self.failing_uploads.borrow().contains(file.display_name()) {
            return Err(ApiError::Status {
                code: 500,
                body: "disk full".to_string(),
            });
        }

        let mut items = self.items.borrow_mut();
        if !items.iter().any(|item| &item.id == item_id) {
            items.push(Item::new(
                item_id.clone(),
                item_name.unwrap_or(item_id.as_str()),
            ));
        }
        self.images
            .borrow_mut()
            .entry(item_id.clone())
            .or_default()
            .push(ImageRef::new(format!(
                "https://cdn.test/{item_id}/{}",
                file.display_name()
            )));
        Ok(())
    }

    async fn delete_image(&self, item_id: &ItemId, filename: &str) -> ApiResult<()> {
        self.record(Call::DeleteImage(item_id.clone(), filename.to_string()));
        self.pause("delete_image").await;
        let mut images = self.images.borrow_mut();
        let Some(list) = images.get_mut(item_id) else {
            return Err(ApiError::Rejected("File not found in DB".to_string()));
        };
        let before = list.len();
        list.retain(|image| image.filename() != filename);
        if list.len() == before {
            return Err(ApiError::Rejected("File not found in DB".to_string()));
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: &ItemId) -> ApiResult<()> {
        self.record(Call::DeleteItem(item_id.clone()));
        self.pause("delete_item").await;
        self.items.borrow_mut().retain(|item| &item.id != item_id);
        self.images.borrow_mut().remove(item_id);
        Ok(())
    }

    async fn update_metadata(&self, item_id: &ItemId, meta_text: &str) -> ApiResult<()> {
        self.record(Call::UpdateMetadata(item_id.clone(), meta_text.to_string()));
        self.pause("update_metadata").await;
        let mut items = self.items.borrow_mut();
        match items.iter_mut().find(|item| &item.id == item_id) {
            Some(item) => {
                item.meta_text = meta_text.to_string();
                Ok(())
            }
            None => Err(ApiError::Status {
                code: 404,
                body: String::new(),
            }),
        }
    }

    async fn query_similar(
        &self,
        file: &StagedFile,
        _top_k: usize,
    ) -> ApiResult<Vec<SimilarityMatch>> {
        self.record(Call::QuerySimilar(file.display_name().to_string()));
        self.pause("query_similar").await;
        Ok(Vec::new())
    }
}
