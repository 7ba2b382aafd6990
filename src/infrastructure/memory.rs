// SPDX-License-Identifier: MPL-2.0
//! In-process catalog implementing the [`Backend`] port.
//!
//! Used by the CLI's `--offline` mode. It follows the same rules as the REST
//! service: the first upload for an unknown id creates the item, deleting an
//! item removes its images, and unknown images or items are reported as
//! rejections rather than silently ignored.

use crate::application::port::{ApiError, ApiResult, Backend};
use crate::domain::{ImageRef, Item, ItemId, SimilarityMatch, StagedFile};
use std::cell::RefCell;
use std::sync::Arc;

const REF_SCHEME: &str = "memory://";

#[derive(Debug, Clone)]
struct StoredImage {
    filename: String,
    bytes: Arc<[u8]>,
}

#[derive(Debug, Clone)]
struct StoredItem {
    id: ItemId,
    name: String,
    meta_text: String,
    created_at: f64,
    images: Vec<StoredImage>,
}

impl StoredItem {
    fn image_ref(&self, image: &StoredImage) -> ImageRef {
        ImageRef::new(format!("{REF_SCHEME}{}/{}", self.id, image.filename))
    }

    fn to_item(&self) -> Item {
        Item {
            id: self.id.clone(),
            display_name: self.name.clone(),
            preview_image: self.images.first().map(|image| self.image_ref(image)),
            meta_text: self.meta_text.clone(),
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Default)]
struct Store {
    items: Vec<StoredItem>,
    last_created_at: f64,
}

impl Store {
    fn find(&self, id: &ItemId) -> Option<&StoredItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn find_mut(&mut self, id: &ItemId) -> Option<&mut StoredItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Creation timestamps are strictly increasing so "recent" is well defined
    /// even when items are created within the same clock tick.
    fn next_created_at(&mut self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
        let stamp = if now > self.last_created_at {
            now
        } else {
            self.last_created_at + 0.001
        };
        self.last_created_at = stamp;
        stamp
    }

    fn ensure_item(&mut self, id: &ItemId, name: Option<&str>) -> &mut StoredItem {
        if self.find(id).is_none() {
            let created_at = self.next_created_at();
            self.items.push(StoredItem {
                id: id.clone(),
                name: name
                    .filter(|n| !n.is_empty())
                    .map_or_else(|| id.to_string(), str::to_string),
                meta_text: String::new(),
                created_at,
                images: Vec::new(),
            });
        }
        // Just ensured above.
        let index = self
            .items
            .iter()
            .position(|item| &item.id == id)
            .unwrap_or(self.items.len() - 1);
        &mut self.items[index]
    }
}

/// Catalog kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: RefCell<Store>,
}

impl InMemoryBackend {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item (or updates its name and metadata if it exists).
    pub fn insert_item(&self, item: &Item) {
        let mut store = self.store.borrow_mut();
        let stored = store.ensure_item(&item.id, Some(&item.display_name));
        stored.name.clone_from(&item.display_name);
        stored.meta_text.clone_from(&item.meta_text);
    }

    /// Stores an image for an item, creating the item if needed, and returns
    /// its reference.
    pub fn insert_image(&self, item_id: &ItemId, file: &StagedFile) -> ImageRef {
        let mut store = self.store.borrow_mut();
        let stored = store.ensure_item(item_id, None);
        let filename = unique_filename(stored, file.display_name());
        let image = StoredImage {
            filename,
            bytes: file.shared_bytes(),
        };
        let image_ref = stored.image_ref(&image);
        stored.images.push(image);
        image_ref
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.store.borrow().items.len()
    }

    /// Returns the bytes behind a reference produced by this backend.
    #[must_use]
    pub fn image_bytes(&self, image: &ImageRef) -> Option<Arc<[u8]>> {
        let rest = image.as_str().strip_prefix(REF_SCHEME)?;
        let (id, filename) = rest.split_once('/')?;
        let store = self.store.borrow();
        store
            .find(&ItemId::new(id))?
            .images
            .iter()
            .find(|stored| stored.filename == filename)
            .map(|stored| Arc::clone(&stored.bytes))
    }
}

fn unique_filename(item: &StoredItem, wanted: &str) -> String {
    let base = if wanted.is_empty() { "image" } else { wanted };
    if !item.images.iter().any(|image| image.filename == base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{n}-{base}"))
        .find(|candidate| !item.images.iter().any(|image| &image.filename == candidate))
        .unwrap_or_else(|| base.to_string())
}

impl Backend for InMemoryBackend {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        let store = self.store.borrow();
        let mut items: Vec<&StoredItem> = store.items.iter().collect();
        items.sort_by(|a, b| a.created_at.total_cmp(&b.created_at));
        Ok(items.into_iter().map(StoredItem::to_item).collect())
    }

    async fn recent_items(&self, limit: usize) -> ApiResult<Vec<Item>> {
        let store = self.store.borrow();
        let mut items: Vec<&StoredItem> = store.items.iter().collect();
        items.sort_by(|a, b| b.created_at.total_cmp(&a.created_at));
        Ok(items
            .into_iter()
            .take(limit.max(1))
            .map(StoredItem::to_item)
            .collect())
    }

    async fn item_images(&self, item_id: &ItemId) -> ApiResult<Vec<ImageRef>> {
        let store = self.store.borrow();
        Ok(store
            .find(item_id)
            .map(|item| item.images.iter().map(|image| item.image_ref(image)).collect())
            .unwrap_or_default())
    }

    async fn upload_image(
        &self,
        item_id: &ItemId,
        item_name: Option<&str>,
        file: &StagedFile,
    ) -> ApiResult<()> {
        let mut store = self.store.borrow_mut();
        let stored = store.ensure_item(item_id, item_name);
        let filename = unique_filename(stored, file.display_name());
        stored.images.push(StoredImage {
            filename,
            bytes: file.shared_bytes(),
        });
        Ok(())
    }

    async fn delete_image(&self, item_id: &ItemId, filename: &str) -> ApiResult<()> {
        let mut store = self.store.borrow_mut();
        let item = store
            .find_mut(item_id)
            .ok_or_else(|| ApiError::Rejected("File not found in DB".to_string()))?;
        let before = item.images.len();
        item.images.retain(|image| image.filename != filename);
        if item.images.len() == before {
            return Err(ApiError::Rejected("File not found in DB".to_string()));
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: &ItemId) -> ApiResult<()> {
        let mut store = self.store.borrow_mut();
        let before = store.items.len();
        store.items.retain(|item| &item.id != item_id);
        if store.items.len() == before {
            return Err(ApiError::Status {
                code: 404,
                body: "Item not found".to_string(),
            });
        }
        Ok(())
    }

    async fn update_metadata(&self, item_id: &ItemId, meta_text: &str) -> ApiResult<()> {
        let mut store = self.store.borrow_mut();
        let item = store.find_mut(item_id).ok_or_else(|| ApiError::Status {
            code: 404,
            body: "Item not found".to_string(),
        })?;
        item.meta_text = meta_text.to_string();
        Ok(())
    }

    async fn query_similar(
        &self,
        _file: &StagedFile,
        _top_k: usize,
    ) -> ApiResult<Vec<SimilarityMatch>> {
        Err(ApiError::Rejected(
            "similarity search is not available offline".to_string(),
        ))
    }
}
