// SPDX-License-Identifier: MPL-2.0
//! `part_finder` keeps a catalog of physical items and their photos in sync
//! with a REST backend.
//!
//! The core is a headless gallery controller: the item list, the item opened
//! from the navigation address, its images, locally staged uploads with live
//! previews, metadata editing and item removal, all kept consistent while
//! requests complete in any order.
//!
//! # Layers
//!
//! - [`domain`]: Plain value types
//! - [`application`]: Ports (traits) the core talks through
//! - [`infrastructure`]: HTTP, in-memory and preview-table adapters
//! - [`gallery`]: Stateful components
//! - [`app`]: Session, runtime, config and paths
//! - [`notifications`], [`i18n`]: User feedback

#![doc(html_root_url = "https://docs.rs/part_finder/0.1.0")]

pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod infrastructure;
pub mod notifications;

pub use app::config;
