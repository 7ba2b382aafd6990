// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **API**: Backend location and client identity
//! - **Catalog**: Recent-items list size
//! - **Query**: Similarity search result count

// ==========================================================================
// API Defaults
// ==========================================================================

/// Backend base URL used when neither config, environment nor CLI set one.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the backend base URL.
pub const ENV_API_URL: &str = "PART_FINDER_API_URL";

/// User agent sent with every backend request.
pub const DEFAULT_USER_AGENT: &str = concat!("PartFinder/", env!("CARGO_PKG_VERSION"));

// ==========================================================================
// Catalog Defaults
// ==========================================================================

/// Number of items shown in the "recent" list.
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Minimum recent-items limit.
pub const MIN_RECENT_LIMIT: usize = 1;

/// Maximum recent-items limit.
pub const MAX_RECENT_LIMIT: usize = 50;

// ==========================================================================
// Query Defaults
// ==========================================================================

/// Number of matches requested from a similarity query.
pub const DEFAULT_TOP_K: usize = 5;

/// Minimum similarity result count.
pub const MIN_TOP_K: usize = 1;

/// Maximum similarity result count.
pub const MAX_TOP_K: usize = 50;
