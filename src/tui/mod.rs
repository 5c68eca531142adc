//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the screens the
//! navigator holds, and translates keyboard events into `Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (a busy screen is current): draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize, or
//!   actions arriving from background tasks.
//!
//! ## Background Work
//!
//! The modal confirmation runs the dialog workflow on a tokio task. Its
//! outcome comes back through the same `mpsc` action channel the start-up
//! timer uses, so every state change still goes through `update()`.

pub mod action;
pub mod app;
mod event;
pub mod screens;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::{Destination, NavigationState, Navigator, Screen};
use crate::tui::action::{Action, Effect, update};
use crate::tui::app::{App, LOADING_DELAY};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::screens::ConfirmDialog;

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Release events are filtered in event.rs
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

/// Map a key to an action. `y`/`n` answer an open modal; otherwise `n`
/// pushes a page.
fn key_action(app: &App, key: char) -> Option<Action> {
    let answering = app.pending_confirm.as_ref().is_some_and(|d| d.is_open());
    match key {
        'y' if answering => Some(Action::Answer(true)),
        'n' if answering => Some(Action::Answer(false)),
        'n' => Some(Action::OpenPage),
        's' => Some(Action::OpenSettings),
        'd' => Some(Action::OpenConfirm),
        'r' => Some(Action::ResetHome),
        'c' => Some(Action::CancelDialogs),
        'q' => Some(Action::Quit),
        _ => None,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let navigator = Navigator::new(NavigationState::bootstrap(), config.policy);
    let mut app = App::new(navigator);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if let Err(e) = app.start(LOADING_DELAY, tx.clone()) {
        warn!("Failed to show the loading page: {e}");
        update(&mut app, Action::Ready);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let busy = app
            .current(Destination::PrimaryScreen)
            .is_some_and(|s| s.core().is_busy());
        if busy {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short while busy, long when idle
        let timeout = if busy {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit => Action::Quit,
                TuiEvent::Escape => Action::Back,
                TuiEvent::Char(c) => match key_action(&app, c) {
                    Some(action) => action,
                    None => continue,
                },
            };
            if !apply(&mut app, action, &tx) {
                break 'main;
            }
        }

        // Handle background task actions (start-up timer, dialog outcomes)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if !apply(&mut app, action, &tx) {
                break 'main;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

/// Run one action and its effect. Returns false when the loop should stop.
fn apply(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::Quit => false,
        Effect::SpawnDialog(dialog) => {
            spawn_dialog(app, dialog, tx.clone());
            true
        }
        Effect::None => true,
    }
}

fn spawn_dialog(app: &App, dialog: Arc<ConfirmDialog>, tx: mpsc::Sender<Action>) {
    info!("Spawning dialog workflow for {}", dialog.core().id());
    let navigator = app.navigator.clone();
    tokio::spawn(async move {
        let result = navigator
            .navigate_dialog(dialog, Destination::DialogHost)
            .await;
        if tx.send(Action::DialogResolved(result)).is_err() {
            warn!("Failed to send dialog outcome: receiver dropped");
        }
    });
}
