// SPDX-License-Identifier: MPL-2.0
//! Gallery state components.
//!
//! Each component owns one slice of state and exposes synchronous
//! `begin_*`/`apply_*` pairs: `begin` records that a request is going out and
//! hands back a ticket, `apply` folds the completion in. Nothing here awaits
//! anything except [`upload::upload_all`]; the session decides what runs and
//! the runtime runs it.
//!
//! # Components
//!
//! - [`catalog`]: Full and recent item lists
//! - [`route`]: Address <-> open item binding and navigation history
//! - [`images`]: Image list of the open item, with stale-result discard
//! - [`staging`]: Files staged for upload and their previews
//! - [`preview`]: Preview handle creation and exactly-once revocation
//! - [`upload`]: Sequential multi-file upload
//! - [`metadata`]: Free-text metadata editor
//! - [`removal`]: Confirmed, de-duplicated item removal

pub mod catalog;
pub mod images;
pub mod metadata;
pub mod preview;
pub mod removal;
pub mod route;
pub mod staging;
pub mod upload;

pub use catalog::{CatalogView, ItemCatalogStore};
pub use images::{DeleteTicket, FetchApplied, FetchTicket, ImageGalleryController};
pub use metadata::{MetadataEditor, SaveRequest};
pub use preview::PreviewHandleManager;
pub use removal::{ConfirmationToken, RemovalTracker};
pub use route::{AddressCodec, NavigationHistory, RouteModalBinder, RouteScheme, RouteState};
pub use staging::FileStagingArea;
pub use upload::{upload_all, UploadOrchestrator};
