//! # Configuration State
//!
//! Flags resolved at startup that shape command behavior.
//!
//! Connection settings go into `BackendState`, and the configured supplier
//! seeds `DraftState`; neither needs to stay around afterwards.
//!
//! ## Thread Safety
//! Read-only after initialization, so no mutex needed.

/// Startup flags read by the commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigState {
    /// Print the create-purchase body instead of sending it.
    pub dry_run: bool,
}

impl ConfigState {
    pub fn new(dry_run: bool) -> Self {
        ConfigState { dry_run }
    }
}
