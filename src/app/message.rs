// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use super::task::UploadPurpose;
use crate::application::port::ApiResult;
use crate::domain::{ImageRef, Item, ItemId, SimilarityMatch, StagedFile, UploadOutcome};
use crate::gallery::{ConfirmationToken, DeleteTicket, FetchTicket};

/// Messages consumed by `GallerySession::update`.
///
/// The first group are user intents; the second are backend completions
/// produced by the runtime.
#[derive(Debug, Clone)]
pub enum Message {
    // ═══════════════════════════════════════════════════════════════════════
    // LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Load the catalog and apply the current address.
    Mount,
    /// Release every staged file and close the open item.
    Unmount,

    // ═══════════════════════════════════════════════════════════════════════
    // NAVIGATION
    // ═══════════════════════════════════════════════════════════════════════
    Select(ItemId),
    Close,
    Back,
    Forward,
    /// An address typed or pasted by the user.
    Navigate(String),

    // ═══════════════════════════════════════════════════════════════════════
    // CATALOG
    // ═══════════════════════════════════════════════════════════════════════
    Refresh,
    LoadRecent,

    // ═══════════════════════════════════════════════════════════════════════
    // OPEN ITEM
    // ═══════════════════════════════════════════════════════════════════════
    FilesSelected(Vec<StagedFile>),
    ClearFiles,
    /// Upload the staged files to the open item.
    Upload,
    DeleteImage(ImageRef),
    MetadataEdited(String),
    SaveMetadata,

    // ═══════════════════════════════════════════════════════════════════════
    // REMOVAL
    // ═══════════════════════════════════════════════════════════════════════
    RequestRemoval(ItemId),
    ConfirmRemoval(ConfirmationToken),
    CancelRemoval,

    // ═══════════════════════════════════════════════════════════════════════
    // OTHER FEATURES
    // ═══════════════════════════════════════════════════════════════════════
    /// Stage files for a new item, with previews.
    DraftFilesSelected(Vec<StagedFile>),
    ClearDraft,
    /// Create an item from the staged draft files.
    CreateItem {
        name: String,
    },
    QuerySimilar(Option<StagedFile>),

    // ═══════════════════════════════════════════════════════════════════════
    // COMPLETIONS
    // ═══════════════════════════════════════════════════════════════════════
    CatalogLoaded {
        seq: u64,
        result: ApiResult<Vec<Item>>,
    },
    RecentLoaded {
        seq: u64,
        result: ApiResult<Vec<Item>>,
    },
    ImagesFetched {
        ticket: FetchTicket,
        result: ApiResult<Vec<ImageRef>>,
    },
    ImageDeleted {
        ticket: DeleteTicket,
        result: ApiResult<()>,
    },
    UploadFinished {
        item_id: ItemId,
        item_name: Option<String>,
        outcome: UploadOutcome,
        purpose: UploadPurpose,
    },
    MetadataSaved {
        item_id: ItemId,
        result: ApiResult<()>,
    },
    ItemRemoved {
        item_id: ItemId,
        result: ApiResult<()>,
    },
    QueryFinished(ApiResult<Vec<SimilarityMatch>>),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Backend base URL. Takes precedence over `PART_FINDER_API_URL`.
    pub api_url: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `PART_FINDER_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Use the in-memory demo catalog instead of the REST backend.
    pub offline: bool,
    /// Log at debug level unless `RUST_LOG` says otherwise.
    pub verbose: bool,
    /// Address to start from (deep link).
    pub address: Option<String>,
}
