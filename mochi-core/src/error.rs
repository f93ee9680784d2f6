//! Error types for the Mochi core stores.

use thiserror::Error;

/// Top-level error type for all core store operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A wallet debit exceeds the user's balance.
    #[error("Insufficient balance: need {needed} points, have {available}")]
    InsufficientBalance {
        /// Points the debit required.
        needed: u64,
        /// Points actually available.
        available: u64,
    },

    /// A transaction with a zero point amount.
    #[error("Transaction amount must be positive")]
    InvalidAmount,

    /// No product with the given ID exists in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(crate::ProductId),

    /// The product exists but cannot be purchased right now.
    #[error("Product unavailable: {reason}")]
    ProductUnavailable {
        /// Why the purchase was refused.
        reason: String,
    },

    /// The session token is unknown or has expired.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
