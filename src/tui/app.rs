//! # Shell State
//!
//! Everything the demo shell shows, kept apart from terminal concerns.
//!
//! ```text
//! App
//! ├── navigator: Navigator                 // handle onto the registered targets
//! ├── status_message: String               // status bar text
//! ├── page_counter: usize                  // numbering for pushed pages
//! ├── pending_confirm: Option<ConfirmDialog> // modal whose workflow is running
//! └── last_answer: Option<DialogOutcome>   // how the previous modal ended
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::core::{Destination, DialogOutcome, NavError, Navigator, ScreenRef};
use crate::tui::action::Action;
use crate::tui::screens::{ConfirmDialog, LoadingScreen};

/// How long the start-up page stays busy.
pub const LOADING_DELAY: Duration = Duration::from_millis(600);

pub struct App {
    pub navigator: Navigator,
    pub status_message: String,
    pub page_counter: usize,
    pub pending_confirm: Option<Arc<ConfirmDialog>>,
    pub last_answer: Option<DialogOutcome<bool>>,
}

impl App {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator,
            status_message: String::from("Loading..."),
            page_counter: 0,
            pending_confirm: None,
            last_answer: None,
        }
    }

    /// Show the busy start-up page. It sends `Action::Ready` on `ready`
    /// after `delay`.
    pub fn start(&mut self, delay: Duration, ready: mpsc::Sender<Action>) -> Result<(), NavError> {
        let loading: ScreenRef = LoadingScreen::new(delay, ready);
        self.navigator.navigate_to_self(&loading)
    }

    /// The destination drawn on top: the host if it holds a modal, then the
    /// dialog screen if anything is stacked there, else the primary screen.
    pub fn visible_destination(&self) -> Destination {
        [Destination::DialogHost, Destination::DialogScreen]
            .into_iter()
            .find(|&destination| self.current(destination).is_some())
            .unwrap_or(Destination::PrimaryScreen)
    }

    pub fn current(&self, destination: Destination) -> Option<ScreenRef> {
        self.navigator.current(destination).ok().flatten()
    }

    /// Titles of a stack, bottom first. Empty for the dialog host.
    pub fn breadcrumbs(&self, destination: Destination) -> Vec<String> {
        let stack = match destination {
            Destination::DialogScreen => self.navigator.state().dialog_screen(),
            Destination::DialogHost => return Vec::new(),
            _ => self.navigator.state().primary_screen(),
        };
        stack
            .map(|stack| {
                stack
                    .snapshot()
                    .iter()
                    .map(|s| s.core().title().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}
