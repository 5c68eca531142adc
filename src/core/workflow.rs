//! # Dialog Workflow
//!
//! Navigate to a dialog, wait for its result, navigate back:
//!
//! ```text
//! navigate_to(dialog) ──► outcome().await ──► token.release() ──► outcome
//!                              ▲
//!              close(v) / force_close() from anywhere
//! ```
//!
//! If the awaiting future is dropped before the dialog resolves, the token
//! drops with it and the dialog is taken off its destination anyway. A
//! dialog that was already taken off (back, clear, host replacement) is not
//! navigated back a second time. A dialog whose enter hook fails is closed
//! and taken off again before the fault is returned.

use std::sync::Arc;

use log::{debug, warn};

use super::destination::Destination;
use super::dialog::{DialogControl, DialogOutcome, DialogScreen};
use super::error::NavError;
use super::navigator::Navigator;
use super::screen::ScreenRef;

impl Navigator {
    /// Show `dialog` at `destination` and resolve with its result.
    ///
    /// Each opening yields exactly one outcome. A dialog that cannot be shown
    /// (unresolved destination, permissive mode) resolves as `Cancelled`.
    pub async fn navigate_dialog<D>(
        &self,
        dialog: Arc<D>,
        destination: Destination,
    ) -> Result<DialogOutcome<D::Output>, NavError>
    where
        D: DialogScreen + 'static,
    {
        let screen: ScreenRef = dialog.clone();
        let (token, mut faults) = self.route(&screen, destination, false)?;
        if !faults.is_empty() {
            // Shown despite the failed hook; take it down again
            warn!(
                "Dialog {} failed to open cleanly; navigating back",
                dialog.core().id()
            );
            dialog.completion().force_close();
            if let Err(e) = token.release() {
                faults.push(e);
            }
            NavError::collect(faults)?;
            return Ok(DialogOutcome::Cancelled);
        }
        if !token.is_armed() {
            dialog.completion().force_close();
            return Ok(DialogOutcome::Cancelled);
        }

        let outcome = dialog.completion().outcome()?.await;
        debug!(
            "Dialog {} resolved (cancelled={})",
            dialog.core().id(),
            outcome.is_cancelled()
        );
        token.release()?;
        Ok(outcome)
    }
}
