//! # Dialog Host
//!
//! Single slot for the active modal. Whatever owns the modal layer of the UI
//! implements [`DialogHost`]; [`DialogSlot`] is the stand-alone version.

use std::sync::{Mutex, PoisonError};

use super::screen::ScreenRef;

pub trait DialogHost: Send + Sync {
    fn current_dialog(&self) -> Option<ScreenRef>;

    fn set_current_dialog(&self, dialog: Option<ScreenRef>);

    /// Empty the slot, returning what it held.
    fn take_dialog(&self) -> Option<ScreenRef> {
        let current = self.current_dialog();
        self.set_current_dialog(None);
        current
    }
}

#[derive(Default)]
pub struct DialogSlot {
    current: Mutex<Option<ScreenRef>>,
}

impl DialogSlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DialogHost for DialogSlot {
    fn current_dialog(&self) -> Option<ScreenRef> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current_dialog(&self, dialog: Option<ScreenRef>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = dialog;
    }

    fn take_dialog(&self) -> Option<ScreenRef> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
