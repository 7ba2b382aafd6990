// SPDX-License-Identifier: MPL-2.0
//! Guarded item removal.
//!
//! Removal is a two-step affair: [`RemovalTracker::request`] hands out a
//! [`ConfirmationToken`], and only [`RemovalTracker::confirm`] with that
//! token lets a request through. At most one request per item is in flight.

use crate::domain::ItemId;
use std::collections::HashSet;

/// Proof that the user was asked to confirm removing an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationToken {
    item_id: ItemId,
    nonce: u64,
}

impl ConfirmationToken {
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }
}

/// Pending confirmation and in-flight removals.
#[derive(Debug, Default)]
pub struct RemovalTracker {
    pending: Option<ConfirmationToken>,
    in_flight: HashSet<ItemId>,
    next_nonce: u64,
}

impl RemovalTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks for confirmation to remove `item_id`, replacing any earlier ask.
    pub fn request(&mut self, item_id: &ItemId) -> ConfirmationToken {
        self.next_nonce += 1;
        let token = ConfirmationToken {
            item_id: item_id.clone(),
            nonce: self.next_nonce,
        };
        self.pending = Some(token.clone());
        token
    }

    /// Consumes a confirmation.
    ///
    /// Returns the id to remove, or `None` when the token is stale or a
    /// removal of that item is already in flight.
    pub fn confirm(&mut self, token: &ConfirmationToken) -> Option<ItemId> {
        if self.pending.as_ref() != Some(token) {
            return None;
        }
        self.pending = None;

        if !self.in_flight.insert(token.item_id.clone()) {
            log::debug!("removal of {} already in flight", token.item_id);
            return None;
        }
        Some(token.item_id.clone())
    }

    /// Drops the pending confirmation, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Marks the removal of `item_id` as resolved.
    pub fn finish(&mut self, item_id: &ItemId) {
        self.in_flight.remove(item_id);
    }

    #[must_use]
    pub fn pending(&self) -> Option<&ConfirmationToken> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_removing(&self, item_id: &ItemId) -> bool {
        self.in_flight.contains(item_id)
    }
}
