//! Messages exchanged with the decision maker.
//!
//! Skills enqueue [`Envelope`]s carrying either a [`TransactionMessage`] to
//! vet and settle, or a [`StateUpdateMessage`] that initializes or adjusts
//! the agent's holdings. The decision maker answers transaction proposals
//! with a response built by [`TransactionMessage::respond_with`].
//!
//! Envelopes are deserializable from JSON. A body whose `kind` is not
//! recognized decodes as [`MessageBody::Unknown`] instead of failing, so a
//! producer speaking a newer dialect cannot crash the consumer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{StateUpdatePerformative, TransactionPerformative};
use crate::ids::{Address, CurrencyId, LedgerId, TransactionDigest, TransactionId};
use crate::{
    CurrencyHoldings, ExchangeParams, GoodHoldings, INTERNAL_PROTOCOL_ID, OFF_CHAIN_LEDGER_ID,
    UtilityParams,
};

/// Errors raised by [`TransactionMessage::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// Sender and counterparty are the same address.
    #[error("sender and counterparty must differ, both are {0}")]
    SelfDealing(Address),

    /// A fee was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeFee {
        /// Name of the offending field.
        field: &'static str,
        /// The negative value.
        value: i64,
    },

    /// The amount was negative.
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(i64),

    /// The currency identifier was empty.
    #[error("currency id must not be empty")]
    EmptyCurrency,

    /// An `Accept` response carried no settlement digest.
    #[error("accepted transaction {0} carries no digest")]
    MissingDigest(TransactionId),
}

// ---------------------------------------------------------------------------
// Transaction message
// ---------------------------------------------------------------------------

/// A transaction proposal, or the decision maker's verdict on one.
///
/// The message is an immutable value: responses are new messages derived
/// from the proposal via [`respond_with`](Self::respond_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    /// Whether this message proposes, accepts or rejects the transaction.
    pub performative: TransactionPerformative,
    /// Identifier of the transaction, stable across proposal and response.
    pub transaction_id: TransactionId,
    /// Address of the agent proposing the transaction.
    pub sender: Address,
    /// Address of the other party.
    pub counterparty: Address,
    /// `true` when the sender pays currency and receives goods.
    pub is_sender_buyer: bool,
    /// Currency the transaction is denominated in.
    pub currency_id: CurrencyId,
    /// Currency amount exchanged, before fees.
    pub amount: i64,
    /// Fee paid by the sender.
    pub sender_tx_fee: i64,
    /// Fee paid by the counterparty.
    pub counterparty_tx_fee: i64,
    /// Goods exchanged, by identifier.
    #[serde(default)]
    pub quantities_by_good_id: GoodHoldings,
    /// Ledger on which the transaction settles, or [`OFF_CHAIN_LEDGER_ID`].
    pub ledger_id: LedgerId,
    /// Free-form information attached by the proposing skill.
    #[serde(default)]
    pub info: BTreeMap<String, serde_json::Value>,
    /// Settlement digest, present on accepted responses.
    #[serde(default)]
    pub transaction_digest: Option<TransactionDigest>,
}

impl TransactionMessage {
    /// Whether the transaction settles off chain.
    pub fn is_off_chain(&self) -> bool {
        self.ledger_id.as_str() == OFF_CHAIN_LEDGER_ID
    }

    /// Build a response to this message.
    ///
    /// Every field is copied from the proposal; only the performative and
    /// the digest change.
    #[must_use]
    pub fn respond_with(
        &self,
        performative: TransactionPerformative,
        transaction_digest: Option<TransactionDigest>,
    ) -> Self {
        Self {
            performative,
            transaction_digest,
            ..self.clone()
        }
    }

    /// Check that the message is internally consistent.
    pub fn check_consistency(&self) -> Result<(), MessageError> {
        if self.sender == self.counterparty {
            return Err(MessageError::SelfDealing(self.sender.clone()));
        }
        if self.currency_id.is_empty() {
            return Err(MessageError::EmptyCurrency);
        }
        if self.amount < 0 {
            return Err(MessageError::NegativeAmount(self.amount));
        }
        if self.sender_tx_fee < 0 {
            return Err(MessageError::NegativeFee {
                field: "sender_tx_fee",
                value: self.sender_tx_fee,
            });
        }
        if self.counterparty_tx_fee < 0 {
            return Err(MessageError::NegativeFee {
                field: "counterparty_tx_fee",
                value: self.counterparty_tx_fee,
            });
        }
        if self.performative == TransactionPerformative::Accept
            && self.transaction_digest.is_none()
        {
            return Err(MessageError::MissingDigest(self.transaction_id.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State update message
// ---------------------------------------------------------------------------

/// A request to set or adjust the agent's financial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "performative", rename_all = "snake_case")]
pub enum StateUpdateMessage {
    /// Initialize holdings and preferences. Moves the agent to ready.
    Initialize {
        /// Starting currency holdings.
        amount_by_currency: CurrencyHoldings,
        /// Starting good holdings.
        quantities_by_good_id: GoodHoldings,
        /// Linear utility weight per currency.
        exchange_params_by_currency: ExchangeParams,
        /// Logarithmic utility weight per good.
        utility_params_by_good_id: UtilityParams,
        /// Total transaction fee, split between buyer and seller.
        tx_fee: i64,
    },
    /// Add deltas to the current holdings.
    Apply {
        /// Currency deltas.
        amount_by_currency: CurrencyHoldings,
        /// Good deltas.
        quantities_by_good_id: GoodHoldings,
    },
}

impl StateUpdateMessage {
    /// The performative of this update.
    pub const fn performative(&self) -> StateUpdatePerformative {
        match self {
            Self::Initialize { .. } => StateUpdatePerformative::Initialize,
            Self::Apply { .. } => StateUpdatePerformative::Apply,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The payload of an [`Envelope`], discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    /// A transaction to vet and settle.
    Transaction(Box<TransactionMessage>),
    /// An update to the agent's financial state.
    StateUpdate(StateUpdateMessage),
    /// Any body the decision maker does not understand.
    #[serde(other)]
    Unknown,
}

/// A message addressed to the decision maker under a protocol identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Protocol the body belongs to. Only [`INTERNAL_PROTOCOL_ID`] is handled.
    pub protocol_id: String,
    /// The message itself.
    pub body: MessageBody,
}

impl Envelope {
    /// Wrap a body under the internal protocol.
    pub fn internal(body: MessageBody) -> Self {
        Self {
            protocol_id: INTERNAL_PROTOCOL_ID.to_owned(),
            body,
        }
    }

    /// Wrap a transaction proposal under the internal protocol.
    pub fn transaction(message: TransactionMessage) -> Self {
        Self::internal(MessageBody::Transaction(Box::new(message)))
    }

    /// Wrap a state update under the internal protocol.
    pub fn state_update(message: StateUpdateMessage) -> Self {
        Self::internal(MessageBody::StateUpdate(message))
    }

    /// Whether the envelope belongs to the internal protocol.
    pub fn is_internal(&self) -> bool {
        self.protocol_id == INTERNAL_PROTOCOL_ID
    }
}
