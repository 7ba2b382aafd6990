// SPDX-License-Identifier: MPL-2.0
//! Application root: the gallery session, its runtime, and startup plumbing.
//!
//! [`GallerySession`] wires the gallery components together behind a single
//! `update(Message) -> Task` entry point. [`Runtime`] executes the commands a
//! task lists against a [`Backend`](crate::application::port::Backend) and
//! feeds the completions back in. Config and path resolution live here too,
//! close to the code that consumes them.

pub mod config;
mod message;
pub mod paths;
pub mod runtime;
pub mod session;
pub mod task;

pub use message::{Flags, Message};
pub use runtime::Runtime;
pub use session::{generate_item_id, Event, GallerySession, SessionSettings};
pub use task::{Command, Task, UploadPurpose};
