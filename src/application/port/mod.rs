// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, so the gallery core can be driven by a
//! real HTTP client, an in-memory store, or a scripted test double.
//!
//! # Available Ports
//!
//! - [`backend`]: The catalog REST contract (items, images, uploads, metadata)
//! - [`preview`]: The process-wide table of local preview handles
//!
//! # Design Notes
//!
//! - All traits use domain types only (no reqwest types)
//! - Backend futures are not required to be `Send`: the session runs on a
//!   single cooperative task
//! - Methods return `Result` with [`ApiError`]

pub mod backend;
pub mod preview;

// Re-export main types for convenience
pub use backend::{ApiError, ApiResult, Backend};
pub use preview::PreviewTable;
