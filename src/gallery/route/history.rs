// SPDX-License-Identifier: MPL-2.0
//! Back/forward address stack.

/// Linear navigation history with a cursor, like a browser tab's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl NavigationHistory {
    /// Starts a history at `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// Current address.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Navigates to `address`, dropping any forward entries.
    ///
    /// Pushing the current address again is a no-op.
    pub fn push(&mut self, address: impl Into<String>) {
        let address = address.into();
        if address == self.current() {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(address);
        self.cursor = self.entries.len() - 1;
    }

    /// Steps back. Returns the new current address, or `None` at the start.
    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Steps forward. Returns the new current address, or `None` at the end.
    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new("/")
    }
}
