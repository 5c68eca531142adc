//! # Screens
//!
//! A screen is anything the navigator can route: a page on the primary stack,
//! a full-screen dialog, or a modal in the dialog host. Each screen embeds a
//! [`ScreenCore`] holding the bookkeeping the navigator needs, and implements
//! [`Screen`] for its behaviour.
//!
//! ## Lifecycle
//!
//! ```text
//!             enter(in_stack)
//!   Detached ─────────────────► Entered(scope)
//!      ▲                              │
//!      └──────────── leave ───────────┘
//! ```
//!
//! Entering an entered screen or leaving a detached one is an invalid-state
//! fault. A screen may cycle through the two states any number of times.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use uuid::Uuid;

use super::destination::Destination;
use super::dialog::DialogControl;
use super::error::{HookError, NavError};
use super::scope::Scope;

/// Unique identity of one screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(Uuid);

impl ScreenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Short display segment (first five hex digits).
    pub fn segment(&self) -> String {
        self.0.simple().to_string()[..5].to_string()
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

enum Lifecycle {
    Detached,
    Entered(Scope),
}

/// Navigator-owned bookkeeping embedded in every screen.
pub struct ScreenCore {
    id: ScreenId,
    title: String,
    busy: AtomicBool,
    current_destination: Mutex<Destination>,
    lifecycle: Mutex<Lifecycle>,
}

impl ScreenCore {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ScreenId::new(),
            title: title.into(),
            busy: AtomicBool::new(false),
            current_destination: Mutex::new(Destination::Default),
            lifecycle: Mutex::new(Lifecycle::Detached),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Release);
    }

    /// Where the navigator last routed this screen. `Default` until first routed.
    pub fn current_destination(&self) -> Destination {
        *self
            .current_destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_current_destination(&self, destination: Destination) {
        *self
            .current_destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = destination;
    }

    pub fn is_entered(&self) -> bool {
        matches!(*self.lifecycle(), Lifecycle::Entered(_))
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ScreenCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenCore")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("busy", &self.is_busy())
            .field("current_destination", &self.current_destination())
            .field("entered", &self.is_entered())
            .finish()
    }
}

/// Behaviour of a navigable screen.
pub trait Screen: Send + Sync {
    fn core(&self) -> &ScreenCore;

    /// Where `Destination::Default` sends this screen.
    fn default_destination(&self) -> Destination {
        Destination::PrimaryScreen
    }

    /// Called after the screen became current. `in_stack` is true when the
    /// screen was already somewhere in the target stack (returning rather
    /// than arriving fresh).
    fn on_enter(&self, _in_stack: bool, _scope: &Scope) -> Result<(), HookError> {
        Ok(())
    }

    /// Called when the screen stops being current, before its scope is disposed.
    fn on_leave(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Dialog capability, if this screen produces a result.
    fn as_dialog(&self) -> Option<&dyn DialogControl> {
        None
    }
}

pub type ScreenRef = Arc<dyn Screen>;

impl fmt::Debug for dyn Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.core(), f)
    }
}

pub(crate) fn same_screen(a: &dyn Screen, b: &dyn Screen) -> bool {
    a.core().id() == b.core().id()
}

/// Detached → Entered. Opens the dialog session for dialog screens.
///
/// The transition is recorded before the hook runs; a failing hook is
/// reported but the screen stays entered.
pub(crate) fn enter(screen: &dyn Screen, in_stack: bool) -> Result<(), NavError> {
    let core = screen.core();
    let scope = {
        let mut lifecycle = core.lifecycle();
        if matches!(*lifecycle, Lifecycle::Entered(_)) {
            return Err(NavError::AlreadyEntered(core.id()));
        }
        let scope = Scope::new();
        *lifecycle = Lifecycle::Entered(scope.clone());
        scope
    };

    if let Some(dialog) = screen.as_dialog() {
        dialog.open();
    }

    debug!(
        "Enter {} '{}' (in_stack={}, destination={})",
        core.id(),
        core.title(),
        in_stack,
        core.current_destination()
    );
    screen
        .on_enter(in_stack, &scope)
        .map_err(|source| NavError::Hook {
            screen: core.id(),
            source,
        })
}

/// Entered → Detached. Runs the leave hook, then disposes the enter scope.
pub(crate) fn leave(screen: &dyn Screen) -> Result<(), NavError> {
    let core = screen.core();
    let scope = {
        let mut lifecycle = core.lifecycle();
        match std::mem::replace(&mut *lifecycle, Lifecycle::Detached) {
            Lifecycle::Entered(scope) => scope,
            Lifecycle::Detached => return Err(NavError::NotEntered(core.id())),
        }
    };

    debug!("Leave {} '{}'", core.id(), core.title());
    let hook = screen.on_leave();
    scope.dispose();
    hook.map_err(|source| NavError::Hook {
        screen: core.id(),
        source,
    })
}

/// Force-close a dialog screen so any pending result await resolves.
pub(crate) fn force_close(screen: &dyn Screen) {
    if let Some(dialog) = screen.as_dialog()
        && dialog.is_open()
    {
        debug!("Force-closing dialog {}", screen.core().id());
        dialog.force_close();
    }
}
