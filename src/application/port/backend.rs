// SPDX-License-Identifier: MPL-2.0
//! Catalog backend port definition.
//!
//! This module defines the [`Backend`] trait mirroring the REST contract the
//! gallery consumes. Every method is a single request; retries, ordering and
//! aggregation are the caller's business.

use crate::domain::{ImageRef, Item, ItemId, SimilarityMatch, StagedFile};
use std::fmt;

// =============================================================================
// ApiError
// =============================================================================

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    Transport(String),

    /// The backend answered with a non-success status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The backend answered 2xx but reported an error in the body.
    Rejected(String),

    /// The response body did not have the expected shape.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "request failed: {msg}"),
            ApiError::Status { code, body } if body.is_empty() => {
                write!(f, "HTTP status {code}")
            }
            ApiError::Status { code, body } => write!(f, "HTTP status {code}: {body}"),
            ApiError::Rejected(msg) => write!(f, "backend rejected request: {msg}"),
            ApiError::Decode(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Result alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Backend Trait
// =============================================================================

/// Port for the catalog REST service.
///
/// # Example
///
/// ```ignore
/// use part_finder::application::port::{ApiResult, Backend};
/// use part_finder::domain::ItemId;
///
/// async fn image_count(backend: &impl Backend, id: &ItemId) -> ApiResult<usize> {
///     Ok(backend.item_images(id).await?.len())
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// `GET /items/` - every item in the catalog.
    async fn list_items(&self) -> ApiResult<Vec<Item>>;

    /// `GET /items/recent?limit=N` - the most recently created items.
    async fn recent_items(&self, limit: usize) -> ApiResult<Vec<Item>>;

    /// `GET /item_images/{id}` - references to every stored image of an item.
    async fn item_images(&self, item_id: &ItemId) -> ApiResult<Vec<ImageRef>>;

    /// `POST /upload/` - stores one image for an item.
    ///
    /// The backend creates the item on first upload, naming it `item_name`
    /// (or the id when absent).
    async fn upload_image(
        &self,
        item_id: &ItemId,
        item_name: Option<&str>,
        file: &StagedFile,
    ) -> ApiResult<()>;

    /// `DELETE /item_image/{id}/{filename}` - deletes one stored image.
    async fn delete_image(&self, item_id: &ItemId, filename: &str) -> ApiResult<()>;

    /// `DELETE /item/{id}` - deletes an item together with all its images.
    async fn delete_item(&self, item_id: &ItemId) -> ApiResult<()>;

    /// `POST /item/{id}/metadata` - replaces the item's free-text metadata.
    async fn update_metadata(&self, item_id: &ItemId, meta_text: &str) -> ApiResult<()>;

    /// `POST /query/` - ranks catalog images by similarity to `file`.
    async fn query_similar(
        &self,
        file: &StagedFile,
        top_k: usize,
    ) -> ApiResult<Vec<SimilarityMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(format!("{err}"), "request failed: connection refused");

        let err = ApiError::Status {
            code: 404,
            body: String::new(),
        };
        assert_eq!(format!("{err}"), "HTTP status 404");

        let err = ApiError::Status {
            code: 500,
            body: "boom".to_string(),
        };
        assert!(format!("{err}").contains("boom"));

        let err = ApiError::Rejected("File not found in DB".to_string());
        assert!(format!("{err}").contains("File not found"));
    }
}
