//! # compras-client: Backend Access for Purchase Intake
//!
//! Everything that leaves the machine: configuration loading and the REST
//! calls that commit a purchase.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 ClientConfig (compras.toml + env)                │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ ApiSettings                             │
//! │  ┌────────────────────────────▼─────────────────────────────────────┐  │
//! │  │                        ComprasClient                             │  │
//! │  │                                                                  │  │
//! │  │   create_compra(CreateCompraRequest) ──► POST /compras           │  │
//! │  │   list_proveedores()                 ──► GET  /proveedores       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Request bodies come from compras-core; this crate never edits them.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`client`] - `ComprasClient` HTTP wrapper
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - Client error types
//! - [`models`] - Backend response bodies

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::ComprasClient;
pub use config::{ApiSettings, ClientConfig, PurchaseSettings};
pub use error::{ClientError, ClientResult};
pub use models::{CompraCreated, Proveedor};
