//! Ownership state and preferences for the Agora agent framework.
//!
//! This crate contains the pure accounting logic the decision maker relies
//! on. Nothing here performs I/O or holds locks; every "mutation" that the
//! decision maker publishes is produced as a new value.
//!
//! # Modules
//!
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`ownership`] -- Currency and good holdings ([`OwnershipState`])
//! - [`preferences`] -- Utility functions, scoring and fee split ([`Preferences`])

pub mod error;
pub mod ownership;
pub mod preferences;

// Re-export primary types at crate root for convenience.
pub use error::AgentError;
pub use ownership::OwnershipState;
pub use preferences::{
    NON_POSITIVE_QUANTITY_UTILITY, Preferences, QUANTITY_SHIFT, SENDER_TX_SHARE_PERCENT,
    TransactionFees, linear_utility, logarithmic_utility, split_tx_fees,
};
