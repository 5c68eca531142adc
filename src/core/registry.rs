//! # Navigation Registry
//!
//! Binds destinations to their targets. Built once at start-up and handed to
//! every [`Navigator`](super::navigator::Navigator) by `Arc`, so there is no
//! process-wide static.
//!
//! ```text
//! NavigationState
//! ├── targets: OnceLock<Targets>     // set once by register()
//! │   ├── primary: NavigationStack   // Destination::PrimaryScreen
//! │   ├── dialog_screen: NavigationStack   // Destination::DialogScreen
//! │   └── dialog_host: dyn DialogHost      // Destination::DialogHost
//! └── gate: Mutex<()>                // one transition at a time
//! ```
//!
//! All navigator mutations run inside a transition. The gate serializes them
//! across threads; a per-thread flag turns a synchronous navigation from
//! inside a lifecycle hook into `NavError::Reentrant` rather than a deadlock.

use std::cell::Cell;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::info;

use super::destination::Destination;
use super::error::NavError;
use super::host::{DialogHost, DialogSlot};
use super::stack::NavigationStack;

thread_local! {
    static IN_TRANSITION: Cell<bool> = const { Cell::new(false) };
}

struct Targets {
    primary: Arc<NavigationStack>,
    dialog_screen: Arc<NavigationStack>,
    dialog_host: Arc<dyn DialogHost>,
}

/// What the shell may interact with, derived from the registered targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellStatus {
    /// False while a dialog screen covers the primary screen.
    pub main_content_enabled: bool,
    /// False while an open modal occupies the dialog host.
    pub dialog_screen_enabled: bool,
}

#[derive(Default)]
pub struct NavigationState {
    targets: OnceLock<Targets>,
    gate: Mutex<()>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with fresh stacks and a [`DialogSlot`] already registered.
    pub fn bootstrap() -> Arc<Self> {
        let state = Self::new();
        let targets = Targets {
            primary: Arc::new(NavigationStack::new(Destination::PrimaryScreen)),
            dialog_screen: Arc::new(NavigationStack::new(Destination::DialogScreen)),
            dialog_host: Arc::new(DialogSlot::new()),
        };
        // A fresh OnceLock is always empty.
        let _ = state.targets.set(targets);
        info!("Navigation targets registered (bootstrap)");
        Arc::new(state)
    }

    /// Register the three targets. Allowed once.
    pub fn register(
        &self,
        primary: Arc<NavigationStack>,
        dialog_screen: Arc<NavigationStack>,
        dialog_host: Arc<dyn DialogHost>,
    ) -> Result<(), NavError> {
        for (stack, expected) in [
            (&primary, Destination::PrimaryScreen),
            (&dialog_screen, Destination::DialogScreen),
        ] {
            if stack.destination() != expected {
                return Err(NavError::Misregistered {
                    expected,
                    found: stack.destination(),
                });
            }
        }

        self.targets
            .set(Targets {
                primary,
                dialog_screen,
                dialog_host,
            })
            .map_err(|_| NavError::AlreadyRegistered)?;
        info!("Navigation targets registered");
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.targets.get().is_some()
    }

    pub fn primary_screen(&self) -> Result<&Arc<NavigationStack>, NavError> {
        Ok(&self.targets()?.primary)
    }

    pub fn dialog_screen(&self) -> Result<&Arc<NavigationStack>, NavError> {
        Ok(&self.targets()?.dialog_screen)
    }

    pub fn dialog_host(&self) -> Result<&Arc<dyn DialogHost>, NavError> {
        Ok(&self.targets()?.dialog_host)
    }

    pub fn shell_status(&self) -> Result<ShellStatus, NavError> {
        let targets = self.targets()?;
        let modal_open = targets
            .dialog_host
            .current_dialog()
            .is_some_and(|d| d.as_dialog().is_some_and(|c| c.is_open()));
        Ok(ShellStatus {
            main_content_enabled: targets.dialog_screen.is_empty(),
            dialog_screen_enabled: !modal_open,
        })
    }

    fn targets(&self) -> Result<&Targets, NavError> {
        self.targets.get().ok_or(NavError::NotRegistered)
    }

    pub(crate) fn begin_transition(&self) -> Result<Transition<'_>, NavError> {
        if IN_TRANSITION.with(Cell::get) {
            return Err(NavError::Reentrant);
        }
        let lock = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        IN_TRANSITION.with(|flag| flag.set(true));
        Ok(Transition { _lock: lock })
    }
}

/// Held for the duration of one navigation transition.
pub(crate) struct Transition<'a> {
    _lock: MutexGuard<'a, ()>,
}

impl Drop for Transition<'_> {
    fn drop(&mut self) {
        IN_TRANSITION.with(|flag| flag.set(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacks() -> (Arc<NavigationStack>, Arc<NavigationStack>, Arc<dyn DialogHost>) {
        (
            Arc::new(NavigationStack::new(Destination::PrimaryScreen)),
            Arc::new(NavigationStack::new(Destination::DialogScreen)),
            Arc::new(DialogSlot::new()),
        )
    }

    #[test]
    fn test_queries_before_register_fail() {
        let state = NavigationState::new();
        assert!(!state.is_registered());
        assert!(matches!(state.primary_screen(), Err(NavError::NotRegistered)));
        assert!(matches!(state.dialog_host(), Err(NavError::NotRegistered)));
        assert!(matches!(state.shell_status(), Err(NavError::NotRegistered)));
    }

    #[test]
    fn test_register_once() {
        let state = NavigationState::new();
        let (primary, dialog_screen, host) = stacks();
        state.register(primary, dialog_screen, host).unwrap();
        assert!(state.is_registered());

        let (primary, dialog_screen, host) = stacks();
        assert!(matches!(
            state.register(primary, dialog_screen, host),
            Err(NavError::AlreadyRegistered)
        ));
    }

    #[test]
    fn test_register_rejects_swapped_stacks() {
        let state = NavigationState::new();
        let (primary, dialog_screen, host) = stacks();
        let err = state.register(dialog_screen, primary, host).unwrap_err();
        assert!(matches!(
            err,
            NavError::Misregistered {
                expected: Destination::PrimaryScreen,
                found: Destination::DialogScreen,
            }
        ));
        assert!(!state.is_registered());
    }

    #[test]
    fn test_transition_rejects_reentry_on_same_thread() {
        let state = NavigationState::bootstrap();
        let outer = state.begin_transition().unwrap();
        assert!(matches!(state.begin_transition(), Err(NavError::Reentrant)));
        drop(outer);
        assert!(state.begin_transition().is_ok());
    }

    #[test]
    fn test_fresh_shell_is_fully_enabled() {
        let state = NavigationState::bootstrap();
        assert_eq!(
            state.shell_status().unwrap(),
            ShellStatus {
                main_content_enabled: true,
                dialog_screen_enabled: true,
            }
        );
    }
}
