use std::fmt;

use super::destination::Destination;
use super::screen::ScreenId;

/// Error returned by a screen's lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError(String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HookError {}

/// Errors raised by the navigation core.
///
/// `AlreadyEntered` and `NotEntered` are programmer errors (invalid-state
/// faults). The navigator never swallows them; they reach the caller of
/// `navigate_to` / `go_back` / `clear_navigation`.
#[derive(Debug)]
pub enum NavError {
    /// Enter requested on a screen that is already entered.
    AlreadyEntered(ScreenId),
    /// Leave requested on a screen that was never entered.
    NotEntered(ScreenId),
    /// The registry was queried before `register` ran.
    NotRegistered,
    /// `register` ran twice.
    AlreadyRegistered,
    /// A stack was registered under the wrong destination.
    Misregistered {
        expected: Destination,
        found: Destination,
    },
    /// No target serves this destination for this screen (strict mode only).
    Unresolved {
        destination: Destination,
        screen: ScreenId,
    },
    /// The dialog host already holds a different open dialog (reject policy only).
    HostOccupied { occupant: ScreenId },
    /// A lifecycle hook tried to navigate synchronously.
    Reentrant,
    /// The dialog's result future was already handed out, or the dialog was never opened.
    ResultUnavailable(ScreenId),
    /// A lifecycle hook failed. The transition itself still completed.
    Hook { screen: ScreenId, source: HookError },
    /// Several faults from one transition or teardown.
    Aggregate(Vec<NavError>),
}

impl NavError {
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, NavError::AlreadyEntered(_) | NavError::NotEntered(_))
    }

    /// Flatten a fault list into a single result: no faults is `Ok`, one
    /// fault is returned as-is, more become `Aggregate`.
    pub fn collect(mut faults: Vec<NavError>) -> Result<(), NavError> {
        match faults.len() {
            0 => Ok(()),
            1 => Err(faults.remove(0)),
            _ => Err(NavError::Aggregate(faults)),
        }
    }

    /// All leaf faults, with `Aggregate` expanded.
    pub fn faults(&self) -> Vec<&NavError> {
        match self {
            NavError::Aggregate(inner) => inner.iter().flat_map(NavError::faults).collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::AlreadyEntered(id) => {
                write!(f, "screen {id} cannot be entered: it is already entered")
            }
            NavError::NotEntered(id) => {
                write!(f, "screen {id} cannot leave: it was never entered")
            }
            NavError::NotRegistered => write!(f, "navigation targets are not registered"),
            NavError::AlreadyRegistered => {
                write!(f, "navigation targets are already registered")
            }
            NavError::Misregistered { expected, found } => {
                write!(f, "stack for {found} registered where {expected} was expected")
            }
            NavError::Unresolved {
                destination,
                screen,
            } => write!(f, "no target for screen {screen} at {destination}"),
            NavError::HostOccupied { occupant } => {
                write!(f, "dialog host is occupied by {occupant}")
            }
            NavError::Reentrant => write!(f, "navigation requested from inside a transition"),
            NavError::ResultUnavailable(id) => {
                write!(f, "dialog {id} has no pending result to await")
            }
            NavError::Hook { screen, source } => {
                write!(f, "lifecycle hook of screen {screen} failed: {source}")
            }
            NavError::Aggregate(faults) => {
                write!(f, "{} navigation faults:", faults.len())?;
                for fault in faults {
                    write!(f, " [{fault}]")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavError::Hook { source, .. } => Some(source),
            _ => None,
        }
    }
}
