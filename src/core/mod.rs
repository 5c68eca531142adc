//! # Navigation Core
//!
//! Destination-based navigation for screens and dialogs. It knows nothing
//! about any specific UI technology.
//!
//! ```text
//!                 navigate_to(screen, Destination)
//!                                │
//!                    ┌───────────▼────────────┐
//!                    │       Navigator        │
//!                    │  resolve ─► transition │
//!                    └───────────┬────────────┘
//!                                │  NavigationState (registry)
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!     │  primary    │     │   dialog    │     │   dialog    │
//!     │  screen     │     │   screen    │     │    host     │
//!     │  (stack)    │     │  (stack)    │     │  (1 slot)   │
//!     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`destination`]: the `Destination` selector
//! - [`screen`]: `Screen` trait, `ScreenCore`, enter/leave lifecycle
//! - [`scope`]: resources disposed when a screen leaves
//! - [`dialog`]: dialog capability and typed result completion
//! - [`stack`], [`host`]: the navigation targets
//! - [`registry`]: `NavigationState`, registration and the transition gate
//! - [`navigator`]: `Navigator` and `NavigationToken`
//! - [`workflow`]: await a dialog's result and navigate back
//! - [`policy`], [`config`]: configurable behaviours and their loading

pub mod config;
pub mod destination;
pub mod dialog;
pub mod error;
pub mod host;
pub mod navigator;
pub mod policy;
pub mod registry;
pub mod scope;
pub mod screen;
pub mod stack;
pub mod workflow;

pub use destination::Destination;
pub use dialog::{DialogCompletion, DialogControl, DialogOutcome, DialogScreen};
pub use error::{HookError, NavError};
pub use host::{DialogHost, DialogSlot};
pub use navigator::{NavigationToken, Navigator, Target};
pub use policy::{HostPolicy, NavigationPolicy};
pub use registry::{NavigationState, ShellStatus};
pub use scope::Scope;
pub use screen::{Screen, ScreenCore, ScreenId, ScreenRef};
pub use stack::NavigationStack;
