//! # Dialog Capability
//!
//! A dialog is a screen that produces one result per opening. The navigator
//! only sees the object-safe [`DialogControl`] (open / force-close), while the
//! dialog workflow uses the typed [`DialogCompletion`] to await the value.
//!
//! ```text
//! enter ──► open()   : fresh session, open = true
//! close(v)           : Completed(v), open = false   (dialog's own logic)
//! force_close()      : Cancelled,    open = false   (teardown / back)
//! ```
//!
//! Whichever of `close` or `force_close` comes first resolves the session;
//! the other is a no-op.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use super::error::NavError;
use super::screen::{Screen, ScreenId};

/// How a dialog session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    /// The dialog set its result.
    Completed(T),
    /// The dialog was force-closed before producing a result.
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogOutcome::Cancelled)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            DialogOutcome::Completed(value) => Some(value),
            DialogOutcome::Cancelled => None,
        }
    }

    /// The completed value, or `default` when cancelled.
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

/// Type-erased dialog control used by the navigator.
pub trait DialogControl: Send + Sync {
    fn is_open(&self) -> bool;

    /// Start a new result session unless one is already open.
    fn open(&self);

    /// Close without a result, resolving any pending await as `Cancelled`.
    fn force_close(&self);
}

struct Session<T> {
    sender: Option<oneshot::Sender<DialogOutcome<T>>>,
    receiver: Option<oneshot::Receiver<DialogOutcome<T>>>,
}

/// Result slot of a dialog screen.
pub struct DialogCompletion<T> {
    owner: ScreenId,
    open: AtomicBool,
    session: Mutex<Session<T>>,
}

impl<T: Send> DialogCompletion<T> {
    /// `owner` is the id of the screen embedding this completion.
    pub fn new(owner: ScreenId) -> Self {
        Self {
            owner,
            open: AtomicBool::new(false),
            session: Mutex::new(Session {
                sender: None,
                receiver: None,
            }),
        }
    }

    /// Deliver the dialog's result. Returns `false` when the current session
    /// already resolved or the dialog is not open.
    pub fn close(&self, value: T) -> bool {
        self.resolve(DialogOutcome::Completed(value))
    }

    /// Take the future of the current session. It can be taken once per opening.
    pub fn outcome(
        &self,
    ) -> Result<impl Future<Output = DialogOutcome<T>> + Send + 'static, NavError>
    where
        T: 'static,
    {
        let receiver = self
            .session()
            .receiver
            .take()
            .ok_or(NavError::ResultUnavailable(self.owner))?;
        // A dropped sender means the session was replaced; treat it as cancelled.
        Ok(async move { receiver.await.unwrap_or(DialogOutcome::Cancelled) })
    }

    fn resolve(&self, outcome: DialogOutcome<T>) -> bool {
        let sender = self.session().sender.take();
        self.open.store(false, Ordering::Release);
        match sender {
            Some(sender) => {
                // The receiver may already be gone (nobody awaited); the session still ends.
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }

    fn session(&self) -> MutexGuard<'_, Session<T>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send> DialogControl for DialogCompletion<T> {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn open(&self) {
        let mut session = self.session();
        if self.open.swap(true, Ordering::AcqRel) {
            return;
        }
        let (sender, receiver) = oneshot::channel();
        session.sender = Some(sender);
        session.receiver = Some(receiver);
    }

    fn force_close(&self) {
        self.resolve(DialogOutcome::Cancelled);
    }
}

impl<T> fmt::Debug for DialogCompletion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogCompletion")
            .field("owner", &self.owner)
            .field("open", &self.open.load(Ordering::Acquire))
            .finish()
    }
}

/// A screen that produces a typed result.
///
/// Implementors must also return `Some(self.completion())` from
/// [`Screen::as_dialog`] so the navigator can force-close them.
pub trait DialogScreen: Screen {
    type Output: Send + 'static;

    fn completion(&self) -> &DialogCompletion<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    fn completion() -> DialogCompletion<u32> {
        DialogCompletion::new(ScreenId::new())
    }

    #[test]
    fn test_close_resolves_once() {
        let dialog = completion();
        dialog.open();
        assert!(dialog.is_open());

        let mut outcome = task::spawn(dialog.outcome().unwrap());
        assert_pending!(outcome.poll());

        assert!(dialog.close(7));
        assert!(!dialog.close(8));
        assert!(!dialog.is_open());
        assert_eq!(assert_ready!(outcome.poll()), DialogOutcome::Completed(7));
    }

    #[test]
    fn test_force_close_cancels_pending_await() {
        let dialog = completion();
        dialog.open();
        let mut outcome = task::spawn(dialog.outcome().unwrap());
        assert_pending!(outcome.poll());

        dialog.force_close();

        assert!(outcome.is_woken());
        assert_eq!(assert_ready!(outcome.poll()), DialogOutcome::Cancelled);
        // The session is over; a late result is rejected.
        assert!(!dialog.close(1));
    }

    #[test]
    fn test_outcome_taken_once_per_session() {
        let dialog = completion();
        assert!(matches!(
            dialog.outcome().err(),
            Some(NavError::ResultUnavailable(_))
        ));

        dialog.open();
        assert!(dialog.outcome().is_ok());
        assert!(dialog.outcome().is_err());
    }

    #[test]
    fn test_open_is_idempotent_while_open() {
        let dialog = completion();
        dialog.open();
        let mut outcome = task::spawn(dialog.outcome().unwrap());
        // Re-entering an open dialog keeps the running session.
        dialog.open();
        dialog.close(3);
        assert_eq!(assert_ready!(outcome.poll()), DialogOutcome::Completed(3));
    }

    #[test]
    fn test_result_set_before_await_is_kept() {
        let dialog = completion();
        dialog.open();
        dialog.close(11);
        let mut outcome = task::spawn(dialog.outcome().unwrap());
        assert_eq!(assert_ready!(outcome.poll()), DialogOutcome::Completed(11));
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(DialogOutcome::Completed(2).into_option(), Some(2));
        assert!(DialogOutcome::<u8>::Cancelled.is_cancelled());
        assert_eq!(DialogOutcome::Cancelled.unwrap_or(9), 9);
    }
}
