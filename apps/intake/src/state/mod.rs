//! # State Module
//!
//! Application state for the intake shell.
//!
//! ## Multiple State Types
//! Each command takes only the state it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    DraftState    │ │   ConfigState    │ │    BackendState      │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Open record   │ │  • Dry-run flag  │ │  • ComprasClient     │   │
//! │  │  • Pending rows  │ │                  │ │                      │   │
//! │  │  • Header        │ │                  │ │                      │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod backend;
mod config;
mod draft;

pub use backend::BackendState;
pub use config::ConfigState;
pub use draft::DraftState;
