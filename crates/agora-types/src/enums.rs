//! Performative enumerations for decision-maker messages.
//!
//! A performative is the speech-act tag of a message: it decides whether a
//! transaction message is a proposal or a verdict, and whether a state
//! update initializes the agent or applies deltas to it.

use serde::{Deserialize, Serialize};

/// The performative of a [`TransactionMessage`].
///
/// Skills send `Propose`; the decision maker answers with `Accept` (carrying
/// a settlement digest) or `Reject`.
///
/// [`TransactionMessage`]: crate::messages::TransactionMessage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPerformative {
    /// A transaction proposed for vetting and settlement.
    Propose,
    /// The transaction was accepted and settled.
    Accept,
    /// The transaction was rejected or could not be settled.
    Reject,
}

impl core::fmt::Display for TransactionPerformative {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Propose => "propose",
            Self::Accept => "accept",
            Self::Reject => "reject",
        };
        f.write_str(s)
    }
}

/// The performative of a [`StateUpdateMessage`].
///
/// [`StateUpdateMessage`]: crate::messages::StateUpdateMessage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateUpdatePerformative {
    /// Set holdings and preferences for the first time.
    Initialize,
    /// Add deltas to the current holdings.
    Apply,
}

impl core::fmt::Display for StateUpdatePerformative {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Initialize => "initialize",
            Self::Apply => "apply",
        };
        f.write_str(s)
    }
}
