// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! Notifications carry message keys and arguments; this module turns them
//! into text using Fluent bundles embedded at build time.
//!
//! # Features
//!
//! - Locale resolution from CLI, config, or system settings
//! - Embedded `.ftl` translation files
//! - Fallback to `en-US` for keys a locale lacks

pub mod fluent;

pub use fluent::{I18n, DEFAULT_LOCALE, REASON_ARG};
