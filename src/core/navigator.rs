//! # Navigator
//!
//! Maps a [`Destination`] onto a registered target and runs each transition
//! with a strict ordering:
//!
//! ```text
//! navigate_to:  outgoing.leave ─► push / reset / host swap ─► (reset teardown) ─► incoming.enter
//! go_back:      top.force_close ─► top.leave ─► pop ─► new_top.enter(in_stack = true)
//! clear:        take snapshot ─► empty target ─► force_close + leave each snapshot entry
//! ```
//!
//! Transitions always run to completion. Hook failures are collected and
//! returned once the target is consistent; invalid-state faults that can be
//! detected up front (entering a screen that is entered elsewhere) fail
//! before anything changes.

use std::sync::Arc;

use log::{debug, warn};

use super::destination::Destination;
use super::error::NavError;
use super::host::DialogHost;
use super::policy::{HostPolicy, NavigationPolicy};
use super::registry::{NavigationState, ShellStatus};
use super::screen::{self, Screen, ScreenId, ScreenRef, same_screen};
use super::stack::NavigationStack;

/// A concrete navigation target.
#[derive(Clone)]
pub enum Target {
    Stack(Arc<NavigationStack>),
    Host(Arc<dyn DialogHost>),
}

impl Target {
    pub fn current(&self) -> Option<ScreenRef> {
        match self {
            Target::Stack(stack) => stack.peek_current(),
            Target::Host(host) => host.current_dialog(),
        }
    }
}

/// Cheap-clone handle that performs navigation against a registry.
#[derive(Clone)]
pub struct Navigator {
    state: Arc<NavigationState>,
    policy: NavigationPolicy,
}

impl Navigator {
    pub fn new(state: Arc<NavigationState>, policy: NavigationPolicy) -> Self {
        Self { state, policy }
    }

    pub fn state(&self) -> &Arc<NavigationState> {
        &self.state
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn shell_status(&self) -> Result<ShellStatus, NavError> {
        self.state.shell_status()
    }

    /// Resolve `destination` for `screen`.
    ///
    /// `Default` goes through the screen's preferred destination. The dialog
    /// host only accepts screens with a dialog capability; anything else is
    /// unresolved, which is `Ok(None)` unless destinations are strict.
    pub fn resolve(
        &self,
        destination: Destination,
        screen: &dyn Screen,
    ) -> Result<Option<(Destination, Target)>, NavError> {
        let destination = destination.resolve_with(screen.default_destination());
        if destination == Destination::DialogHost && screen.as_dialog().is_none() {
            if self.policy.strict_destinations {
                return Err(NavError::Unresolved {
                    destination,
                    screen: screen.core().id(),
                });
            }
            warn!(
                "Screen {} '{}' cannot be shown in the {destination}; ignoring",
                screen.core().id(),
                screen.core().title()
            );
            return Ok(None);
        }
        Ok(Some((destination, self.target(destination)?)))
    }

    /// The target serving a destination. `Default` means the primary screen.
    pub fn target(&self, destination: Destination) -> Result<Target, NavError> {
        Ok(match destination {
            Destination::Default | Destination::PrimaryScreen => {
                Target::Stack(self.state.primary_screen()?.clone())
            }
            Destination::DialogScreen => Target::Stack(self.state.dialog_screen()?.clone()),
            Destination::DialogHost => Target::Host(self.state.dialog_host()?.clone()),
        })
    }

    /// Current screen of a destination.
    pub fn current(&self, destination: Destination) -> Result<Option<ScreenRef>, NavError> {
        Ok(self.target(destination)?.current())
    }

    /// Route `screen` to `destination`, optionally resetting the target stack
    /// first. Returns a token whose release navigates back once.
    ///
    /// When a hook fails the transition still completes and the screen stays
    /// where it was routed; the faults are returned instead of the token.
    pub fn navigate_to(
        &self,
        screen: &ScreenRef,
        destination: Destination,
        reset: bool,
    ) -> Result<NavigationToken, NavError> {
        let (token, faults) = self.route(screen, destination, reset)?;
        if let Err(e) = NavError::collect(faults) {
            token.detach();
            return Err(e);
        }
        Ok(token)
    }

    /// Run a transition and hand back both the armed token and any hook
    /// faults. `Err` means nothing changed.
    pub(crate) fn route(
        &self,
        screen: &ScreenRef,
        destination: Destination,
        reset: bool,
    ) -> Result<(NavigationToken, Vec<NavError>), NavError> {
        let Some((destination, target)) = self.resolve(destination, screen.as_ref())? else {
            return Ok((NavigationToken::inert(), Vec::new()));
        };

        let _transition = self.state.begin_transition()?;
        let faults = match target {
            Target::Stack(stack) => self.push(&stack, screen, destination, reset)?,
            Target::Host(host) => self.show(host.as_ref(), screen)?,
        };
        let token = NavigationToken::new(self.clone(), destination, screen.core().id());
        Ok((token, faults))
    }

    /// Navigate `screen` to its own default destination and stay there.
    pub fn navigate_to_self(&self, screen: &ScreenRef) -> Result<(), NavError> {
        self.navigate_to(screen, Destination::Default, false)
            .map(NavigationToken::detach)
    }

    /// Like [`navigate_to_self`](Self::navigate_to_self), clearing the target first.
    pub fn navigate_to_self_and_reset(
        &self,
        screen: &ScreenRef,
        destination: Destination,
    ) -> Result<(), NavError> {
        self.navigate_to(screen, destination, true)
            .map(NavigationToken::detach)
    }

    /// Pop the current screen of `destination`. Returns the popped screen, or
    /// `None` when there was nothing to pop.
    pub fn go_back(&self, destination: Destination) -> Result<Option<ScreenRef>, NavError> {
        self.pop(destination, None)
    }

    /// Go back on `destination` only while `expected` is its current screen.
    fn pop(
        &self,
        destination: Destination,
        expected: Option<ScreenId>,
    ) -> Result<Option<ScreenRef>, NavError> {
        let target = self.target(destination)?;
        let _transition = self.state.begin_transition()?;
        let mut faults = Vec::new();

        let popped = match target {
            Target::Stack(stack) => {
                let Some(top) = stack.peek_current() else {
                    debug!("{}: nothing to go back from", stack.destination());
                    return Ok(None);
                };
                if !is_expected(&top, expected) {
                    return Ok(None);
                }
                screen::force_close(top.as_ref());
                record(&mut faults, screen::leave(top.as_ref()));
                let popped = stack.back();
                if let Some(new_top) = stack.peek_current() {
                    record(&mut faults, screen::enter(new_top.as_ref(), true));
                }
                popped
            }
            Target::Host(host) => {
                let Some(current) = host.current_dialog() else {
                    debug!("dialog host: nothing to go back from");
                    return Ok(None);
                };
                if !is_expected(&current, expected) {
                    return Ok(None);
                }
                let Some(dialog) = host.take_dialog() else {
                    return Ok(None);
                };
                screen::force_close(dialog.as_ref());
                record(&mut faults, screen::leave(dialog.as_ref()));
                Some(dialog)
            }
        };

        NavError::collect(faults)?;
        Ok(popped)
    }

    /// Go back on the destination `screen` was last routed to.
    pub fn back_from(&self, screen: &dyn Screen) -> Result<Option<ScreenRef>, NavError> {
        self.go_back(screen.core().current_destination())
    }

    /// Empty a destination. Every screen it held is force-closed if it is a
    /// dialog and leaves if it is entered; faults are aggregated after all
    /// screens were attempted.
    pub fn clear_navigation(&self, destination: Destination) -> Result<(), NavError> {
        let target = self.target(destination)?;
        let _transition = self.state.begin_transition()?;
        let snapshot = match target {
            Target::Stack(stack) => stack.clear(),
            Target::Host(host) => host.take_dialog().into_iter().collect(),
        };
        debug!("Clearing {destination}: {} screens", snapshot.len());
        NavError::collect(teardown(&snapshot, None))
    }

    /// Clear the destination `screen` was last routed to.
    pub fn cancel_from(&self, screen: &dyn Screen) -> Result<(), NavError> {
        self.clear_navigation(screen.core().current_destination())
    }

    fn push(
        &self,
        stack: &NavigationStack,
        screen: &ScreenRef,
        destination: Destination,
        reset: bool,
    ) -> Result<Vec<NavError>, NavError> {
        let outgoing = stack.peek_current();
        ensure_can_enter(screen.as_ref(), outgoing.as_deref())?;

        screen.core().set_current_destination(destination);
        let in_stack = stack.contains(screen.core().id());

        let mut faults = Vec::new();
        if let Some(outgoing) = &outgoing {
            record(&mut faults, screen::leave(outgoing.as_ref()));
        }

        if reset {
            let removed = stack.navigate_and_reset(screen.clone());
            faults.extend(teardown(&removed, Some(screen.as_ref())));
        } else {
            stack.navigate(screen.clone());
        }

        record(&mut faults, screen::enter(screen.as_ref(), in_stack));
        Ok(faults)
    }

    fn show(&self, host: &dyn DialogHost, dialog: &ScreenRef) -> Result<Vec<NavError>, NavError> {
        let occupant = host.current_dialog();
        let replacing = occupant
            .as_ref()
            .filter(|occupant| occupant.core().id() != dialog.core().id());

        if let Some(occupant) = replacing
            && self.policy.host_policy == HostPolicy::Reject
            && occupant.as_dialog().is_some_and(|d| d.is_open())
        {
            return Err(NavError::HostOccupied {
                occupant: occupant.core().id(),
            });
        }
        ensure_can_enter(dialog.as_ref(), occupant.as_deref())?;

        dialog.core().set_current_destination(Destination::DialogHost);

        let mut faults = Vec::new();
        if let Some(occupant) = &occupant {
            if replacing.is_some() {
                debug!(
                    "Replacing dialog {} with {}",
                    occupant.core().id(),
                    dialog.core().id()
                );
                screen::force_close(occupant.as_ref());
            }
            if occupant.core().is_entered() {
                record(&mut faults, screen::leave(occupant.as_ref()));
            }
        }

        host.set_current_dialog(Some(dialog.clone()));
        record(&mut faults, screen::enter(dialog.as_ref(), false));
        Ok(faults)
    }
}

/// The incoming screen may only be entered already if it is the screen about
/// to leave.
fn ensure_can_enter(screen: &dyn Screen, outgoing: Option<&dyn Screen>) -> Result<(), NavError> {
    let leaving_first = outgoing.is_some_and(|outgoing| same_screen(outgoing, screen));
    if screen.core().is_entered() && !leaving_first {
        return Err(NavError::AlreadyEntered(screen.core().id()));
    }
    Ok(())
}

/// A token only goes back over the screen it navigated to.
fn is_expected(current: &ScreenRef, expected: Option<ScreenId>) -> bool {
    match expected {
        Some(id) if current.core().id() != id => {
            debug!(
                "{} is no longer current ({} is); not going back",
                id,
                current.core().id()
            );
            false
        }
        _ => true,
    }
}

fn record(faults: &mut Vec<NavError>, result: Result<(), NavError>) {
    if let Err(fault) = result {
        warn!("Navigation fault: {fault}");
        faults.push(fault);
    }
}

/// Force-close and leave every screen of a removed snapshot.
///
/// Screens covered by a later push already left when they were covered, so
/// only entered ones receive `leave`. `keep` is the screen replacing the
/// snapshot; its dialog session is left running.
fn teardown(snapshot: &[ScreenRef], keep: Option<&dyn Screen>) -> Vec<NavError> {
    let mut faults = Vec::new();
    for screen in snapshot {
        if keep.is_some_and(|keep| same_screen(keep, screen.as_ref())) {
            continue;
        }
        screen::force_close(screen.as_ref());
        if screen.core().is_entered() {
            record(&mut faults, screen::leave(screen.as_ref()));
        }
    }
    faults
}

/// One-shot handle returned by [`Navigator::navigate_to`].
///
/// Releasing it navigates back once on the destination it was issued for,
/// provided the screen it navigated to is still current there. A screen
/// already taken off by `go_back`, a clear or a host replacement leaves
/// nothing for the token to undo.
///
/// Dropping an unreleased token releases it, so an early return or a
/// cancelled future still restores the previous screen. `release` consumes
/// the token, so it cannot be released twice.
#[must_use = "dropping a NavigationToken navigates back immediately; call detach() to stay"]
pub struct NavigationToken {
    pending: Option<Pending>,
}

struct Pending {
    navigator: Navigator,
    destination: Destination,
    screen: ScreenId,
}

impl Pending {
    fn release(self) -> Result<(), NavError> {
        self.navigator
            .pop(self.destination, Some(self.screen))
            .map(|_| ())
    }
}

impl NavigationToken {
    fn new(navigator: Navigator, destination: Destination, screen: ScreenId) -> Self {
        Self {
            pending: Some(Pending {
                navigator,
                destination,
                screen,
            }),
        }
    }

    /// A token that does nothing on release (unresolved navigation).
    pub fn inert() -> Self {
        Self { pending: None }
    }

    pub fn destination(&self) -> Option<Destination> {
        self.pending.as_ref().map(|pending| pending.destination)
    }

    /// The screen this token navigates back from.
    pub fn screen(&self) -> Option<ScreenId> {
        self.pending.as_ref().map(|pending| pending.screen)
    }

    /// False for inert and detached tokens.
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Navigate back now.
    pub fn release(mut self) -> Result<(), NavError> {
        match self.pending.take() {
            Some(pending) => pending.release(),
            None => Ok(()),
        }
    }

    /// Keep the navigation; never go back.
    pub fn detach(mut self) {
        self.pending = None;
    }
}

impl Drop for NavigationToken {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            let destination = pending.destination;
            if let Err(e) = pending.release() {
                warn!("Navigation token release on {destination} failed: {e}");
            }
        }
    }
}

impl std::fmt::Debug for NavigationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationToken")
            .field("destination", &self.destination())
            .field("screen", &self.screen())
            .finish()
    }
}
