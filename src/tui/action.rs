//! # Actions
//!
//! Everything that can happen in the shell becomes an `Action`.
//! User presses `n`? That's `Action::OpenPage`.
//! A modal's workflow finishes? That's `Action::DialogResolved(outcome)`.
//!
//! `update()` applies an action to the [`App`] through its navigator and
//! returns an [`Effect`] for the loop to carry out. Spawning tasks and
//! terminal I/O happen in the loop, never here.
//!
//! ```text
//! App + Action  →  update()  →  Effect
//! ```

use std::sync::Arc;

use log::{debug, warn};

use crate::core::{Destination, DialogOutcome, NavError, ScreenRef};
use crate::tui::app::App;
use crate::tui::screens::{ConfirmDialog, PageScreen, SettingsScreen};

#[derive(Debug)]
pub enum Action {
    /// Start-up finished; replace the loading page with Home.
    Ready,
    OpenPage,
    OpenSettings,
    OpenConfirm,
    Answer(bool),
    /// Go back on the topmost visible destination.
    Back,
    ResetHome,
    /// Clear the dialog screen stack.
    CancelDialogs,
    DialogResolved(Result<DialogOutcome<bool>, NavError>),
    Quit,
}

/// Side effect requested by `update`.
#[derive(Debug)]
pub enum Effect {
    None,
    Quit,
    /// Run the dialog workflow for this modal.
    SpawnDialog(Arc<ConfirmDialog>),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Ready => {
            reset_home(app);
            Effect::None
        }
        Action::OpenPage => {
            if !main_content_enabled(app) {
                app.status_message = "Close the dialog screen first".to_string();
                return Effect::None;
            }
            app.page_counter += 1;
            let page: ScreenRef = PageScreen::new(format!("Page {}", app.page_counter));
            let result = app.navigator.navigate_to_self(&page);
            report(app, result, "Opened page");
            Effect::None
        }
        Action::OpenSettings => {
            let settings: ScreenRef = SettingsScreen::new();
            let result = app.navigator.navigate_to_self(&settings);
            report(app, result, "Opened settings");
            Effect::None
        }
        Action::OpenConfirm => {
            if app.pending_confirm.is_some() {
                app.status_message = "A confirmation is already open".to_string();
                return Effect::None;
            }
            let dialog = ConfirmDialog::new("Discard the current page?");
            app.pending_confirm = Some(dialog.clone());
            Effect::SpawnDialog(dialog)
        }
        Action::Answer(yes) => {
            let delivered = app
                .pending_confirm
                .as_ref()
                .is_some_and(|dialog| dialog.answer(yes));
            if !delivered {
                app.status_message = "No confirmation is waiting for an answer".to_string();
            }
            Effect::None
        }
        Action::Back => {
            let destination = app.visible_destination();
            let at_root = destination == Destination::PrimaryScreen
                && app.breadcrumbs(destination).len() <= 1;
            if at_root {
                app.status_message = "Already at the first page".to_string();
                return Effect::None;
            }
            let result = app.navigator.go_back(destination).map(|_| ());
            report(app, result, &format!("Back on {destination}"));
            Effect::None
        }
        Action::ResetHome => {
            reset_home(app);
            Effect::None
        }
        Action::CancelDialogs => {
            let result = app.navigator.clear_navigation(Destination::DialogScreen);
            report(app, result, "Dialog screen cleared");
            Effect::None
        }
        Action::DialogResolved(result) => {
            app.pending_confirm = None;
            match result {
                Ok(outcome) => {
                    app.status_message = match &outcome {
                        DialogOutcome::Completed(true) => "Confirmed".to_string(),
                        DialogOutcome::Completed(false) => "Declined".to_string(),
                        DialogOutcome::Cancelled => "Confirmation cancelled".to_string(),
                    };
                    app.last_answer = Some(outcome);
                }
                Err(e) => {
                    warn!("Dialog workflow failed: {e}");
                    app.status_message = format!("Dialog failed: {e}");
                }
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn reset_home(app: &mut App) {
    app.page_counter = 0;
    let home: ScreenRef = PageScreen::new("Home");
    let result = app
        .navigator
        .navigate_to_self_and_reset(&home, Destination::PrimaryScreen);
    report(app, result, "Home");
}

fn main_content_enabled(app: &App) -> bool {
    app.navigator
        .shell_status()
        .map(|status| status.main_content_enabled)
        .unwrap_or(false)
}

fn report(app: &mut App, result: Result<(), NavError>, success: &str) {
    app.status_message = match result {
        Ok(()) => success.to_string(),
        Err(e) => {
            warn!("Navigation failed: {e}");
            format!("Navigation failed: {e}")
        }
    };
}
