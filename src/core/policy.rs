//! # Navigation Policy
//!
//! Two behaviours are permissive by default and can be made fail-fast:
//!
//! - **Unresolved destinations**: a screen routed somewhere no target serves
//!   it (a non-dialog sent to the dialog host) is ignored and gets an inert
//!   token. `strict_destinations` turns this into `NavError::Unresolved`.
//! - **Occupied host**: opening a modal while another one is open replaces it
//!   (the old one leaves and is force-closed). `HostPolicy::Reject` fails
//!   with `NavError::HostOccupied` instead.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostPolicy {
    #[default]
    Replace,
    Reject,
}

impl HostPolicy {
    /// Parse a policy name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(HostPolicy::Replace),
            "reject" => Some(HostPolicy::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationPolicy {
    pub strict_destinations: bool,
    pub host_policy: HostPolicy,
}

impl NavigationPolicy {
    /// Fail-fast on both permissive behaviours.
    pub fn strict() -> Self {
        Self {
            strict_destinations: true,
            host_policy: HostPolicy::Reject,
        }
    }
}
