use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::warn;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Char(char),
    Escape,
    ForceQuit, // Ctrl+C
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Terminal read errors are
/// logged and treated as no event.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Failed to poll terminal events: {e}");
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Failed to read terminal event: {e}");
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Keyboard enhancement reports releases too; act on presses only
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::Char(c)) => Some(TuiEvent::Char(c)),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                _ => None,
            }
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
