//! # Mochi Core
//!
//! Domain stores for the Mochi rewards & reading platform:
//!
//! - **Wallet** — per-user point balances backed by an append-only
//!   transaction ledger ([`wallet::WalletStore`])
//! - **Catalog** — redeemable coupons and merchandise
//!   ([`catalog::ProductCatalog`])
//! - **Sessions** — authentication state with expiry
//!   ([`session::SessionStore`])
//! - **Maintenance gate** — daily time-of-day feature availability
//!   ([`maintenance::MaintenanceWindow`])
//!
//! All stores are in-memory, thread-safe collaborators consumed by the
//! platform layer. Cloning a store shares the underlying state.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod metrics;
pub mod session;
pub mod types;
pub mod wallet;

pub use config::MochiConfig;
pub use error::CoreError;
pub use types::*;
