//! Shared type definitions for the Agora agent framework.
//!
//! This crate is the single source of truth for the identifiers, holdings
//! maps and decision-maker messages used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for currencies, goods, ledgers,
//!   addresses and transactions
//! - [`enums`] -- Performatives of transaction and state-update messages
//! - [`messages`] -- Transaction / state-update messages and the envelope
//!   that carries them into the decision maker

pub mod enums;
pub mod ids;
pub mod messages;

use std::collections::BTreeMap;

// Re-export all public types at crate root for convenience.
pub use enums::{StateUpdatePerformative, TransactionPerformative};
pub use ids::{Address, CurrencyId, GoodId, LedgerId, TransactionDigest, TransactionId};
pub use messages::{Envelope, MessageBody, MessageError, StateUpdateMessage, TransactionMessage};

/// Currency holdings: amount per currency.
pub type CurrencyHoldings = BTreeMap<CurrencyId, i64>;

/// Good holdings: quantity per good.
pub type GoodHoldings = BTreeMap<GoodId, i64>;

/// Linear utility weight per currency.
pub type ExchangeParams = BTreeMap<CurrencyId, f64>;

/// Logarithmic utility weight per good.
pub type UtilityParams = BTreeMap<GoodId, f64>;

/// Protocol identifier of messages addressed to the decision maker.
pub const INTERNAL_PROTOCOL_ID: &str = "internal";

/// Ledger identifier marking a transaction that settles off chain.
pub const OFF_CHAIN_LEDGER_ID: &str = "off_chain";
