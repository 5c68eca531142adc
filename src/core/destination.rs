//! # Destinations
//!
//! Abstract selectors naming where a screen should be routed. Callers never
//! touch a stack or the dialog host directly; they pick a `Destination` and
//! the navigator maps it onto the registered target.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Destination {
    /// Route to whatever the screen itself prefers. Never a concrete target.
    #[default]
    Default,
    /// The main screen stack.
    PrimaryScreen,
    /// The full-screen dialog stack drawn over the primary screen.
    DialogScreen,
    /// The single-slot modal host.
    DialogHost,
}

impl Destination {
    /// Collapse `Default` into a concrete destination.
    ///
    /// `preferred` is the screen's own default destination. If that is also
    /// `Default`, the primary screen wins.
    pub fn resolve_with(self, preferred: Destination) -> Destination {
        match (self, preferred) {
            (Destination::Default, Destination::Default) => Destination::PrimaryScreen,
            (Destination::Default, preferred) => preferred,
            (concrete, _) => concrete,
        }
    }

    pub fn is_concrete(self) -> bool {
        self != Destination::Default
    }

    pub fn label(self) -> &'static str {
        match self {
            Destination::Default => "default",
            Destination::PrimaryScreen => "primary screen",
            Destination::DialogScreen => "dialog screen",
            Destination::DialogHost => "dialog host",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
