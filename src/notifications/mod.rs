// SPDX-License-Identifier: MPL-2.0
//! User feedback as a side-effect sink.
//!
//! Operations push a [`Notification`] carrying an i18n key and typed
//! arguments; whatever front-end is attached renders them with
//! [`I18n::render`](crate::i18n::I18n::render).

mod manager;
mod notification;

pub use manager::Manager;
pub use notification::{ArgValue, Notification, NotificationId, Severity};
