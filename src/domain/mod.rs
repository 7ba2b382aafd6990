// SPDX-License-Identifier: MPL-2.0
//! Domain layer - catalog and gallery value types with ZERO external dependencies.
//!
//! This module contains the plain data the rest of the crate passes around.
//! Wire formats live in the infrastructure adapters, never here, so these types
//! can be built freely in tests.
//!
//! # Modules
//!
//! - [`item`]: Catalog entries ([`Item`](item::Item), [`ItemId`](item::ItemId))
//! - [`image`]: Stored image references ([`ImageRef`](image::ImageRef))
//! - [`staged`]: Local files awaiting upload ([`StagedFile`](staged::StagedFile),
//!   [`PreviewHandle`](staged::PreviewHandle))
//! - [`upload`]: Aggregate upload result ([`UploadOutcome`](upload::UploadOutcome))
//! - [`query`]: Similarity search results ([`SimilarityMatch`](query::SimilarityMatch))

pub mod image;
pub mod item;
pub mod query;
pub mod staged;
pub mod upload;

pub use image::ImageRef;
pub use item::{Item, ItemId};
pub use query::SimilarityMatch;
pub use staged::{PreviewHandle, StagedFile};
pub use upload::UploadOutcome;
