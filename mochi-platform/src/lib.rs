//! # Mochi Platform
//!
//! Integration layer between the core stores and the assistant client.
//! Request handlers call into this crate; it wires [`mochi_core::MochiConfig`]
//! into a working [`mochi_assistant::Assistant`], gates assistant features
//! behind the daily maintenance window, and gates wallet/catalog flows
//! behind session authentication.

pub mod assistant;
pub mod rewards;

pub use assistant::{build_assistant, SupportDesk, MAINTENANCE_MESSAGE};
pub use rewards::{CheckInOutcome, RewardsService};
