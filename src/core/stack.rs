//! # Navigation Stack
//!
//! Ordered history of screens for one destination. The last entry is the
//! current screen. The stack is a plain container: lifecycle hooks are the
//! navigator's job, and it runs them inside the same transition as the
//! container change.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use super::destination::Destination;
use super::screen::{ScreenId, ScreenRef};

pub struct NavigationStack {
    destination: Destination,
    entries: Mutex<Vec<ScreenRef>>,
}

impl NavigationStack {
    /// An empty stack serving `destination`.
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Push `screen`; it becomes current.
    pub fn navigate(&self, screen: ScreenRef) {
        let mut entries = self.entries();
        entries.push(screen);
        debug!("{}: navigate, depth {}", self.destination, entries.len());
    }

    /// Replace the whole stack with `screen`. Returns the removed entries,
    /// bottom first, so the caller can tear them down.
    pub fn navigate_and_reset(&self, screen: ScreenRef) -> Vec<ScreenRef> {
        let removed = std::mem::replace(&mut *self.entries(), vec![screen]);
        debug!(
            "{}: navigate and reset, {} removed",
            self.destination,
            removed.len()
        );
        removed
    }

    /// Pop the current screen. An empty stack is reported and left alone.
    pub fn back(&self) -> Option<ScreenRef> {
        let popped = self.entries().pop();
        if popped.is_none() {
            warn!("{}: back on an empty stack", self.destination);
        }
        popped
    }

    pub fn peek_current(&self) -> Option<ScreenRef> {
        self.entries().last().cloned()
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.entries().iter().any(|s| s.core().id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Copy of the current contents, bottom first.
    pub fn snapshot(&self) -> Vec<ScreenRef> {
        self.entries().clone()
    }

    /// Empty the stack, returning what it held (the teardown snapshot).
    pub fn clear(&self) -> Vec<ScreenRef> {
        std::mem::take(&mut *self.entries())
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ScreenRef>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for NavigationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles: Vec<String> = self
            .entries()
            .iter()
            .map(|s| s.core().title().to_string())
            .collect();
        f.debug_struct("NavigationStack")
            .field("destination", &self.destination)
            .field("entries", &titles)
            .finish()
    }
}
