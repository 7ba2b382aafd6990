// SPDX-License-Identifier: MPL-2.0
//! `reqwest` adapter implementing the [`Backend`] port.
//!
//! Endpoints are built from the configured base URL with properly encoded
//! path segments, so item ids and filenames never need manual escaping.
//!
//! # Status Handling
//!
//! - Non-2xx responses become [`ApiError::Status`]
//! - 2xx responses whose JSON body has an `"error"` key become
//!   [`ApiError::Rejected`] (the backend reports "file not found" that way)
//! - Bodies that fail to parse become [`ApiError::Decode`]

use crate::application::port::{ApiError, ApiResult, Backend};
use crate::domain::{ImageRef, Item, ItemId, SimilarityMatch, StagedFile};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ItemDto {
    item_id: String,
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    preview_image: Option<String>,
    #[serde(default)]
    meta_text: Option<String>,
    #[serde(default)]
    ctime: Option<f64>,
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        let display_name = dto
            .item_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| dto.item_id.clone());
        Item {
            id: ItemId::new(dto.item_id),
            display_name,
            preview_image: dto.preview_image.map(ImageRef::new),
            meta_text: dto.meta_text.unwrap_or_default(),
            created_at: dto.ctime,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    items: Vec<ItemDto>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MatchDto {
    item_id: String,
    #[serde(default)]
    item_name: Option<String>,
    distance: f64,
    #[serde(default)]
    preview_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    matches: Vec<MatchDto>,
}

// =============================================================================
// Body Decoding
// =============================================================================

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_items(body: &str) -> ApiResult<Vec<Item>> {
    let response: ItemsResponse = decode(body)?;
    Ok(response.items.into_iter().map(Item::from).collect())
}

fn decode_images(body: &str) -> ApiResult<Vec<ImageRef>> {
    let response: ImagesResponse = decode(body)?;
    Ok(response.images.into_iter().map(ImageRef::new).collect())
}

fn decode_matches(body: &str) -> ApiResult<Vec<SimilarityMatch>> {
    let response: MatchesResponse = decode(body)?;
    Ok(response
        .matches
        .into_iter()
        .map(|m| SimilarityMatch {
            item_id: ItemId::new(m.item_id),
            item_name: m.item_name,
            distance: m.distance,
            preview_image: m.preview_image.map(ImageRef::new),
        })
        .collect())
}

/// Checks a 2xx body for an in-band `"error"` report.
fn check_acknowledged(body: &str) -> ApiResult<()> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return Ok(());
    };
    match value.get("error") {
        Some(serde_json::Value::String(msg)) => Err(ApiError::Rejected(msg.clone())),
        Some(other) => Err(ApiError::Rejected(other.to_string())),
        None => Ok(()),
    }
}

fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body
    } else {
        let mut short: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        short.push('…');
        short
    }
}

fn file_part(file: &StagedFile) -> Part {
    Part::bytes(file.bytes().to_vec()).file_name(file.display_name().to_string())
}

// =============================================================================
// HttpBackend
// =============================================================================

/// Backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, user_agent: &str) -> ApiResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base URL '{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Returns the service root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL from path segments. An empty trailing segment
    /// produces a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                body: truncate_body(body),
            });
        }
        Ok(body)
    }

    async fn send_acknowledged(&self, request: reqwest::RequestBuilder) -> ApiResult<()> {
        let body = self.send(request).await?;
        check_acknowledged(&body)
    }
}

impl Backend for HttpBackend {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        let url = self.endpoint(&["items", ""]);
        log::debug!("GET {url}");
        let body = self.send(self.client.get(url)).await?;
        decode_items(&body)
    }

    async fn recent_items(&self, limit: usize) -> ApiResult<Vec<Item>> {
        let mut url = self.endpoint(&["items", "recent"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        log::debug!("GET {url}");
        let body = self.send(self.client.get(url)).await?;
        decode_items(&body)
    }

    async fn item_images(&self, item_id: &ItemId) -> ApiResult<Vec<ImageRef>> {
        let url = self.endpoint(&["item_images", item_id.as_str()]);
        log::debug!("GET {url}");
        let body = self.send(self.client.get(url)).await?;
        decode_images(&body)
    }

    async fn upload_image(
        &self,
        item_id: &ItemId,
        item_name: Option<&str>,
        file: &StagedFile,
    ) -> ApiResult<()> {
        let url = self.endpoint(&["upload", ""]);
        log::debug!("POST {url} ({}, {} bytes)", file.display_name(), file.len());

        let mut form = Form::new()
            .text("item_id", item_id.to_string())
            .part("file", file_part(file));
        if let Some(name) = item_name {
            form = form.text("item_name", name.to_string());
        }

        self.send_acknowledged(self.client.post(url).multipart(form))
            .await
    }

    async fn delete_image(&self, item_id: &ItemId, filename: &str) -> ApiResult<()> {
        let url = self.endpoint(&["item_image", item_id.as_str(), filename]);
        log::debug!("DELETE {url}");
        self.send_acknowledged(self.client.delete(url)).await
    }

    async fn delete_item(&self, item_id: &ItemId) -> ApiResult<()> {
        let url = self.endpoint(&["item", item_id.as_str()]);
        log::debug!("DELETE {url}");
        self.send_acknowledged(self.client.delete(url)).await
    }

    async fn update_metadata(&self, item_id: &ItemId, meta_text: &str) -> ApiResult<()> {
        let url = self.endpoint(&["item", item_id.as_str(), "metadata"]);
        log::debug!("POST {url}");
        // The endpoint takes the text as a bare JSON string body.
        self.send_acknowledged(self.client.post(url).json(meta_text))
            .await
    }

    async fn query_similar(
        &self,
        file: &StagedFile,
        top_k: usize,
    ) -> ApiResult<Vec<SimilarityMatch>> {
        let url = self.endpoint(&["query", ""]);
        log::debug!("POST {url} (top {top_k})");
        let form = Form::new()
            .part("file", file_part(file))
            .text("topk", top_k.to_string());
        let body = self.send(self.client.post(url).multipart(form)).await?;
        decode_matches(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, "PartFinder/test").expect("valid base url")
    }

    #[test]
    fn endpoint_keeps_trailing_slash() {
        let b = backend("http://127.0.0.1:8000");
        assert_eq!(
            b.endpoint(&["items", ""]).as_str(),
            "http://127.0.0.1:8000/items/"
        );
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let b = backend("http://example.com/api/");
        assert_eq!(
            b.endpoint(&["item", "abc", "metadata"]).as_str(),
            "http://example.com/api/item/abc/metadata"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let b = backend("http://example.com");
        let url = b.endpoint(&["item_image", "a b", "x/y.jpg"]);
        assert_eq!(url.path(), "/item_image/a%20b/x%2Fy.jpg");
    }

    #[test]
    fn new_rejects_invalid_base() {
        assert!(matches!(
            HttpBackend::new("not a url", "ua"),
            Err(ApiError::Transport(_))
        ));
        assert!(HttpBackend::new("mailto:someone@example.com", "ua").is_err());
    }

    #[test]
    fn decode_items_maps_wire_names() {
        let body = r#"{"items":[
            {"item_id":"a1","item_name":"Bracket","preview_image":"https://s3/a1/0.jpg","meta_text":"steel","ctime":1700000000.5},
            {"item_id":"b2","item_name":null,"preview_image":null,"meta_text":null}
        ]}"#;
        let items = decode_items(body).expect("valid body");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::new("a1"));
        assert_eq!(items[0].display_name, "Bracket");
        assert_eq!(items[0].meta_text, "steel");
        assert_eq!(items[0].created_at, Some(1_700_000_000.5));
        assert_eq!(items[1].display_name, "b2");
        assert!(items[1].preview_image.is_none());
        assert!(items[1].meta_text.is_empty());
    }

    #[test]
    fn decode_images_keeps_order() {
        let images = decode_images(r#"{"images":["u/1.jpg","u/2.jpg"]}"#).expect("valid");
        assert_eq!(images, vec![ImageRef::new("u/1.jpg"), ImageRef::new("u/2.jpg")]);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        assert!(matches!(decode_images(r#"{"urls":[]}"#), Err(ApiError::Decode(_))));
    }

    #[test]
    fn decode_matches_reads_optional_fields() {
        let body = r#"{"matches":[{"item_id":"a1","distance":0.125},
            {"item_id":"b2","item_name":"Gear","distance":0.5,"preview_image":"p.jpg"}]}"#;
        let matches = decode_matches(body).expect("valid");
        assert_eq!(matches[0].label(), "a1");
        assert_eq!(matches[1].label(), "Gear");
        assert_eq!(matches[1].preview_image, Some(ImageRef::new("p.jpg")));
    }

    #[test]
    fn acknowledgement_detects_in_band_errors() {
        assert!(check_acknowledged(r#"{"item_id":"a","status":"deleted"}"#).is_ok());
        assert!(check_acknowledged("plain text").is_ok());
        assert_eq!(
            check_acknowledged(r#"{"error":"File not found in DB"}"#),
            Err(ApiError::Rejected("File not found in DB".to_string()))
        );
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS + 50);
        let short = truncate_body(body);
        assert_eq!(short.chars().count(), MAX_ERROR_BODY_CHARS + 1);
    }
}
