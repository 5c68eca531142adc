//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::destination::Destination;
use crate::core::dialog::{DialogCompletion, DialogControl, DialogScreen};
use crate::core::error::HookError;
use crate::core::navigator::{NavigationToken, Navigator};
use crate::core::policy::NavigationPolicy;
use crate::core::registry::NavigationState;
use crate::core::scope::Scope;
use crate::core::screen::{Screen, ScreenCore, ScreenId, ScreenRef};

/// Ordered record of lifecycle hook calls, shared by every test screen.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries.lock().unwrap().iter().position(|e| e == entry)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// Plain screen that journals its hooks and counts scope disposals.
pub struct TestScreen {
    core: ScreenCore,
    journal: Journal,
    destination: Destination,
    fail_enter: AtomicBool,
    fail_leave: AtomicBool,
    disposals: Arc<AtomicUsize>,
    navigate_on_enter: Mutex<Option<(Navigator, ScreenRef)>>,
}

impl TestScreen {
    pub fn new(title: &str, journal: &Journal) -> Arc<Self> {
        Self::with_destination(title, journal, Destination::PrimaryScreen)
    }

    pub fn with_destination(title: &str, journal: &Journal, destination: Destination) -> Arc<Self> {
        Arc::new(Self {
            core: ScreenCore::new(title),
            journal: journal.clone(),
            destination,
            fail_enter: AtomicBool::new(false),
            fail_leave: AtomicBool::new(false),
            disposals: Arc::new(AtomicUsize::new(0)),
            navigate_on_enter: Mutex::new(None),
        })
    }

    pub fn fail_enter(&self, fail: bool) {
        self.fail_enter.store(fail, Ordering::SeqCst);
    }

    pub fn fail_leave(&self, fail: bool) {
        self.fail_leave.store(fail, Ordering::SeqCst);
    }

    /// How many enter scopes were disposed.
    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    /// On the next enter, try to navigate `next` onto the primary screen.
    pub fn navigate_on_enter(&self, navigator: Navigator, next: ScreenRef) {
        *self.navigate_on_enter.lock().unwrap() = Some((navigator, next));
    }
}

impl Screen for TestScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn default_destination(&self) -> Destination {
        self.destination
    }

    fn on_enter(&self, in_stack: bool, scope: &Scope) -> Result<(), HookError> {
        let kind = if in_stack { "in_stack" } else { "fresh" };
        self.journal
            .record(format!("enter {} {kind}", self.core.title()));
        let disposals = self.disposals.clone();
        scope.add(move || {
            disposals.fetch_add(1, Ordering::SeqCst);
        });

        let pending = self.navigate_on_enter.lock().unwrap().take();
        if let Some((navigator, next)) = pending {
            navigator
                .navigate_to(&next, Destination::PrimaryScreen, false)
                .map(NavigationToken::detach)
                .map_err(|e| HookError::new(e.to_string()))?;
        }

        if self.fail_enter.load(Ordering::SeqCst) {
            return Err(HookError::new(format!("{} refused to enter", self.core.title())));
        }
        Ok(())
    }

    fn on_leave(&self) -> Result<(), HookError> {
        self.journal.record(format!("leave {}", self.core.title()));
        if self.fail_leave.load(Ordering::SeqCst) {
            return Err(HookError::new(format!("{} refused to leave", self.core.title())));
        }
        Ok(())
    }
}

/// Dialog screen producing a `String`, preferring the dialog host.
pub struct TestDialog {
    core: ScreenCore,
    journal: Journal,
    completion: DialogCompletion<String>,
    fail_enter: AtomicBool,
}

impl TestDialog {
    pub fn new(title: &str, journal: &Journal) -> Arc<Self> {
        let core = ScreenCore::new(title);
        let completion = DialogCompletion::new(core.id());
        Arc::new(Self {
            core,
            journal: journal.clone(),
            completion,
            fail_enter: AtomicBool::new(false),
        })
    }

    pub fn fail_enter(&self, fail: bool) {
        self.fail_enter.store(fail, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.completion.is_open()
    }

    /// Close with a result, as the dialog's own logic would.
    pub fn answer(&self, value: &str) -> bool {
        self.completion.close(value.to_string())
    }
}

impl Screen for TestDialog {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn default_destination(&self) -> Destination {
        Destination::DialogHost
    }

    fn on_enter(&self, in_stack: bool, _scope: &Scope) -> Result<(), HookError> {
        let kind = if in_stack { "in_stack" } else { "fresh" };
        self.journal
            .record(format!("enter {} {kind}", self.core.title()));
        if self.fail_enter.load(Ordering::SeqCst) {
            return Err(HookError::new(format!("{} refused to enter", self.core.title())));
        }
        Ok(())
    }

    fn on_leave(&self) -> Result<(), HookError> {
        self.journal.record(format!("leave {}", self.core.title()));
        Ok(())
    }

    fn as_dialog(&self) -> Option<&dyn DialogControl> {
        Some(&self.completion)
    }
}

impl DialogScreen for TestDialog {
    type Output = String;

    fn completion(&self) -> &DialogCompletion<String> {
        &self.completion
    }
}

pub fn ids(screens: &[ScreenRef]) -> Vec<ScreenId> {
    screens.iter().map(|s| s.core().id()).collect()
}

/// A navigator over freshly bootstrapped targets, permissive policy.
pub fn navigator() -> Navigator {
    Navigator::new(NavigationState::bootstrap(), NavigationPolicy::default())
}

/// A navigator over freshly bootstrapped targets, fail-fast policy.
pub fn strict_navigator() -> Navigator {
    Navigator::new(NavigationState::bootstrap(), NavigationPolicy::strict())
}
