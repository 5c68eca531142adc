//! # Demo Screens
//!
//! The screens the shell navigates between:
//!
//! - [`LoadingScreen`]: busy start-up page that asks the loop to continue
//!   once its timer fires. The timer task lives in the enter scope, so
//!   leaving early aborts it.
//! - [`PageScreen`]: ordinary page on the primary stack.
//! - [`SettingsScreen`]: full-screen dialog on the dialog screen stack.
//! - [`ConfirmDialog`]: yes/no modal in the dialog host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::{
    Destination, DialogCompletion, DialogControl, DialogScreen, HookError, Scope, Screen,
    ScreenCore,
};
use crate::tui::action::Action;

pub struct LoadingScreen {
    core: ScreenCore,
    delay: Duration,
    ready: mpsc::Sender<Action>,
}

impl LoadingScreen {
    pub fn new(delay: Duration, ready: mpsc::Sender<Action>) -> Arc<Self> {
        let core = ScreenCore::new("Loading");
        core.set_busy(true);
        Arc::new(Self { core, delay, ready })
    }
}

impl Screen for LoadingScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn on_enter(&self, _in_stack: bool, scope: &Scope) -> Result<(), HookError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| HookError::new(format!("no runtime for start-up timer: {e}")))?;
        let delay = self.delay;
        let ready = self.ready.clone();
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if ready.send(Action::Ready).is_err() {
                warn!("Failed to send Ready: receiver dropped");
            }
        });
        scope.add_abort(timer.abort_handle());
        Ok(())
    }

    fn on_leave(&self) -> Result<(), HookError> {
        self.core.set_busy(false);
        Ok(())
    }
}

pub struct PageScreen {
    core: ScreenCore,
    visits: Arc<AtomicUsize>,
}

impl PageScreen {
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            core: ScreenCore::new(title),
            visits: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of times the page became current.
    pub fn visits(&self) -> usize {
        self.visits.load(Ordering::Acquire)
    }
}

impl Screen for PageScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn on_enter(&self, in_stack: bool, scope: &Scope) -> Result<(), HookError> {
        let visits = self.visits.fetch_add(1, Ordering::AcqRel) + 1;
        if in_stack {
            debug!("'{}' is current again (visit {visits})", self.core.title());
        } else {
            info!("'{}' opened", self.core.title());
        }
        let title = self.core.title().to_string();
        scope.add(move || debug!("'{title}' released its resources"));
        Ok(())
    }
}

pub struct SettingsScreen {
    core: ScreenCore,
}

impl SettingsScreen {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            core: ScreenCore::new("Settings"),
        })
    }
}

impl Screen for SettingsScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn default_destination(&self) -> Destination {
        Destination::DialogScreen
    }
}

pub struct ConfirmDialog {
    core: ScreenCore,
    prompt: String,
    completion: DialogCompletion<bool>,
}

impl ConfirmDialog {
    pub fn new(prompt: impl Into<String>) -> Arc<Self> {
        let core = ScreenCore::new("Confirm");
        let completion = DialogCompletion::new(core.id());
        Arc::new(Self {
            core,
            prompt: prompt.into(),
            completion,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_open(&self) -> bool {
        self.completion.is_open()
    }

    /// Answer the prompt. False if the dialog is not showing.
    pub fn answer(&self, yes: bool) -> bool {
        self.completion.close(yes)
    }
}

impl std::fmt::Debug for ConfirmDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmDialog")
            .field("id", &self.core.id())
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl Screen for ConfirmDialog {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn default_destination(&self) -> Destination {
        Destination::DialogHost
    }

    fn as_dialog(&self) -> Option<&dyn DialogControl> {
        Some(&self.completion)
    }
}

impl DialogScreen for ConfirmDialog {
    type Output = bool;

    fn completion(&self) -> &DialogCompletion<bool> {
        &self.completion
    }
}
