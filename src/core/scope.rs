//! # Enter Scope
//!
//! Resources a screen acquires while it is entered (subscriptions, timers,
//! background tasks) go into the `Scope` handed to `on_enter`. The navigator
//! disposes the scope when the matching leave fires, so every cleanup runs
//! exactly once without the screen tracking it.
//!
//! ```text
//! enter ──► Scope::new() ──► on_enter(in_stack, &scope) ──► scope.add(..)
//! leave ──► on_leave() ──► scope.dispose()  (cleanups run in add order)
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use tokio::task::AbortHandle;

type Cleanup = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct ScopeInner {
    disposed: bool,
    cleanups: Vec<Cleanup>,
}

/// Cloneable handle to one enter/leave session's resources.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Arc<Mutex<ScopeInner>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup. If the scope is already disposed the cleanup runs now.
    pub fn add(&self, cleanup: impl FnOnce() + Send + 'static) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.disposed {
            drop(inner);
            cleanup();
            return;
        }
        inner.cleanups.push(Box::new(cleanup));
    }

    /// Abort a background task when the scope is disposed.
    pub fn add_abort(&self, handle: AbortHandle) {
        self.add(move || handle.abort());
    }

    pub fn is_disposed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .disposed
    }

    /// Number of cleanups still pending.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cleanups
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every pending cleanup once. Later calls are no-ops.
    pub(crate) fn dispose(&self) {
        let cleanups = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            std::mem::take(&mut inner.cleanups)
        };
        if !cleanups.is_empty() {
            debug!("Disposing scope with {} cleanups", cleanups.len());
        }
        // Cleanups run outside the lock so they may add to the scope again.
        for cleanup in cleanups {
            cleanup();
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("disposed", &self.is_disposed())
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_dispose_runs_cleanups_in_order_once() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let scope = Scope::new();
        for i in 0..3 {
            let order = order.clone();
            scope.add(move || order.lock().unwrap().push(i));
        }
        assert_eq!(scope.len(), 3);

        scope.dispose();
        scope.dispose();

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(scope.is_disposed());
        assert!(scope.is_empty());
    }

    #[test]
    fn test_add_after_dispose_runs_immediately() {
        let count = Arc::new(AtomicUsize::new(0));
        let scope = Scope::new();
        scope.dispose();

        let c = count.clone();
        scope.add(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let count = Arc::new(AtomicUsize::new(0));
        let scope = Scope::new();
        let handle = scope.clone();
        let c = count.clone();
        handle.add(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        scope.dispose();
        assert!(handle.is_disposed());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_abort_cancels_task() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        let scope = Scope::new();
        scope.add_abort(task.abort_handle());

        scope.dispose();

        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
