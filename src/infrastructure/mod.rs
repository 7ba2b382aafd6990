// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: The catalog REST service over `reqwest` (implements [`Backend`])
//! - [`memory`]: An in-process catalog for offline use (implements [`Backend`])
//! - [`blob`]: Process-wide `blob:` URI table (implements [`PreviewTable`])
//!
//! [`Backend`]: crate::application::port::Backend
//! [`PreviewTable`]: crate::application::port::PreviewTable

pub mod blob;
pub mod http;
pub mod memory;

// Re-export main types for convenience
pub use blob::BlobPreviewTable;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
