// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports the gallery core talks through.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The gallery core and session only see the traits
//!
//! # Example
//!
//! ```ignore
//! use part_finder::application::port::Backend;
//! use part_finder::infrastructure::http::HttpBackend;
//!
//! // Infrastructure implements the port trait
//! let backend = HttpBackend::new("http://127.0.0.1:8000", "PartFinder/0.1.0")?;
//! let items = backend.list_items().await?;
//! ```

pub mod port;
