//! The decision maker: gatekeeper of the agent's financial state.
//!
//! Producers enqueue [`Envelope`]s through a [`DecisionMakerHandle`]. One
//! [`DecisionMaker`] drains the queue in FIFO order, one cycle per call to
//! [`DecisionMaker::execute`]:
//!
//! - A transaction proposal is accepted when it does not lower the agent's
//!   score and the agent can pay for it. An accepted proposal is settled
//!   (off chain, or through the [`LedgerApi`]) and answered with ACCEPT and
//!   the settlement digest; everything else is answered with REJECT.
//! - An INITIALIZE state update sets holdings and preferences and marks
//!   the agent ready. An APPLY state update adds deltas to the holdings.
//!
//! Holdings and preferences live in copy-on-write slots. Every change is
//! published as a new snapshot with a single pointer swap, so readers that
//! loaded the previous snapshot keep a consistent view.

use std::sync::Arc;

use agora_agents::{OwnershipState, Preferences};
use agora_ledger::{LedgerApi, Wallet};
use agora_types::{
    CurrencyHoldings, Envelope, GoodHoldings, MessageBody, StateUpdateMessage, TransactionDigest,
    TransactionMessage, TransactionPerformative,
};
use arc_swap::ArcSwap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::readiness::{GoalPursuitReadiness, ReadinessStatus};

/// Errors surfaced to producers.
#[derive(Debug, thiserror::Error)]
pub enum DecisionMakerError {
    /// The decision maker was dropped; the envelope is handed back.
    #[error("decision maker queue is closed")]
    QueueClosed(Box<Envelope>),
}

/// Counts of one drain cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Envelopes taken off the queue.
    pub handled: usize,
    /// Envelopes dropped for an unknown protocol or body.
    pub dropped: usize,
    /// Transactions answered with ACCEPT.
    pub accepted: usize,
    /// Transactions answered with REJECT.
    pub rejected: usize,
}

/// What handling one envelope amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Dropped,
    StateUpdated,
    Responded(TransactionPerformative),
}

/// State shared between the decision maker and its handles.
#[derive(Debug, Default)]
struct SharedState {
    ownership: ArcSwap<OwnershipState>,
    preferences: ArcSwap<Preferences>,
    readiness: GoalPursuitReadiness,
}

/// Producer side of the decision maker: enqueue envelopes and read the
/// current snapshots.
#[derive(Debug, Clone)]
pub struct DecisionMakerHandle {
    inbox: UnboundedSender<Envelope>,
    shared: Arc<SharedState>,
}

impl DecisionMakerHandle {
    /// Enqueue an envelope for the next drain cycle.
    pub fn send(&self, envelope: Envelope) -> Result<(), DecisionMakerError> {
        self.inbox
            .send(envelope)
            .map_err(|err| DecisionMakerError::QueueClosed(Box::new(err.0)))
    }

    /// The current ownership snapshot.
    pub fn ownership_state(&self) -> Arc<OwnershipState> {
        self.shared.ownership.load_full()
    }

    /// The current preferences snapshot.
    pub fn preferences(&self) -> Arc<Preferences> {
        self.shared.preferences.load_full()
    }

    /// Whether the agent has been initialized.
    pub fn is_ready(&self) -> bool {
        self.shared.readiness.is_ready()
    }
}

/// Single consumer of the decision-maker queue.
pub struct DecisionMaker {
    agent_name: String,
    max_reactions: usize,
    inbox: UnboundedReceiver<Envelope>,
    outbox: UnboundedSender<TransactionMessage>,
    shared: Arc<SharedState>,
    ledger: Arc<dyn LedgerApi>,
    wallet: Wallet,
}

impl DecisionMaker {
    /// Create a decision maker for `agent_name`.
    ///
    /// Returns the decision maker, a handle for producers, and the
    /// receiving end of the outbound queue carrying transaction responses.
    pub fn new(
        agent_name: impl Into<String>,
        wallet: Wallet,
        ledger: Arc<dyn LedgerApi>,
    ) -> (Self, DecisionMakerHandle, UnboundedReceiver<TransactionMessage>) {
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SharedState::default());
        let handle = DecisionMakerHandle {
            inbox: inbox_tx,
            shared: Arc::clone(&shared),
        };
        let decision_maker = Self {
            agent_name: agent_name.into(),
            max_reactions: 0,
            inbox,
            outbox,
            shared,
            ledger,
            wallet,
        };
        (decision_maker, handle, outbox_rx)
    }

    /// Limit the envelopes handled per drain cycle. Zero means no limit.
    #[must_use]
    pub const fn with_max_reactions(mut self, max_reactions: usize) -> Self {
        self.max_reactions = max_reactions;
        self
    }

    /// The agent name used in log events.
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// The current ownership snapshot.
    pub fn ownership_state(&self) -> Arc<OwnershipState> {
        self.shared.ownership.load_full()
    }

    /// The current preferences snapshot.
    pub fn preferences(&self) -> Arc<Preferences> {
        self.shared.preferences.load_full()
    }

    /// The goal-pursuit readiness status.
    pub fn readiness(&self) -> ReadinessStatus {
        self.shared.readiness.status()
    }

    /// Run one drain cycle.
    ///
    /// Handles queued envelopes in order until the queue is empty or
    /// `max_reactions` envelopes have been handled; the rest stay queued
    /// for the next cycle. Never blocks waiting for new envelopes.
    pub fn execute(&mut self) -> DrainSummary {
        let limit = if self.max_reactions == 0 {
            usize::MAX
        } else {
            self.max_reactions
        };
        let mut summary = DrainSummary::default();
        while summary.handled < limit {
            let Ok(envelope) = self.inbox.try_recv() else {
                break;
            };
            summary.handled = summary.handled.saturating_add(1);
            match self.handle_envelope(envelope) {
                Outcome::Dropped => summary.dropped = summary.dropped.saturating_add(1),
                Outcome::StateUpdated => {}
                Outcome::Responded(TransactionPerformative::Accept) => {
                    summary.accepted = summary.accepted.saturating_add(1);
                }
                Outcome::Responded(_) => summary.rejected = summary.rejected.saturating_add(1),
            }
        }
        debug!(
            agent = %self.agent_name,
            handled = summary.handled,
            accepted = summary.accepted,
            rejected = summary.rejected,
            dropped = summary.dropped,
            "drain cycle complete"
        );
        summary
    }

    fn handle_envelope(&self, envelope: Envelope) -> Outcome {
        if !envelope.is_internal() {
            warn!(
                agent = %self.agent_name,
                protocol_id = %envelope.protocol_id,
                "message from unknown protocol, dropping"
            );
            return Outcome::Dropped;
        }
        match envelope.body {
            MessageBody::Transaction(tx) => {
                let response = self.handle_transaction(&tx);
                let performative = response.performative;
                if let Err(err) = self.outbox.send(response) {
                    warn!(
                        agent = %self.agent_name,
                        transaction_id = %err.0.transaction_id,
                        "outbound queue closed, response discarded"
                    );
                }
                Outcome::Responded(performative)
            }
            MessageBody::StateUpdate(update) => {
                self.handle_state_update(update);
                Outcome::StateUpdated
            }
            MessageBody::Unknown => {
                warn!(agent = %self.agent_name, "message with unknown body, ignoring");
                Outcome::Dropped
            }
        }
    }

    // -------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------

    fn handle_transaction(&self, tx: &TransactionMessage) -> TransactionMessage {
        if let Err(err) = tx.check_consistency() {
            warn!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                error = %err,
                "inconsistent transaction, rejecting"
            );
            return tx.respond_with(TransactionPerformative::Reject, None);
        }
        if !self.is_acceptable(tx) {
            info!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                "transaction not acceptable, rejecting"
            );
            return tx.respond_with(TransactionPerformative::Reject, None);
        }
        match self.settle(tx) {
            Some(digest) => {
                info!(
                    agent = %self.agent_name,
                    transaction_id = %tx.transaction_id,
                    digest = %digest,
                    "transaction settled"
                );
                tx.respond_with(TransactionPerformative::Accept, Some(digest))
            }
            None => tx.respond_with(TransactionPerformative::Reject, None),
        }
    }

    fn is_acceptable(&self, tx: &TransactionMessage) -> bool {
        self.is_utility_enhancing(tx) && self.is_affordable(tx)
    }

    fn is_utility_enhancing(&self, tx: &TransactionMessage) -> bool {
        let ownership = self.shared.ownership.load();
        let preferences = self.shared.preferences.load();
        if !(ownership.is_initialized() && preferences.is_initialized()) {
            warn!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                "preferences or ownership not initialized, assuming the transaction is utility enhancing"
            );
            return true;
        }
        match preferences.score_diff_from_transaction(&ownership, tx) {
            Ok(score_diff) => {
                debug!(
                    agent = %self.agent_name,
                    transaction_id = %tx.transaction_id,
                    score_diff,
                    "evaluated transaction utility"
                );
                score_diff >= 0.0
            }
            Err(err) => {
                warn!(
                    agent = %self.agent_name,
                    transaction_id = %tx.transaction_id,
                    error = %err,
                    "transaction utility could not be evaluated"
                );
                false
            }
        }
    }

    fn is_affordable(&self, tx: &TransactionMessage) -> bool {
        if tx.is_off_chain() {
            warn!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                "off-chain transaction, cannot verify affordability, assuming it is affordable"
            );
            return true;
        }
        let Some(crypto_object) = self.wallet.crypto_object(&tx.ledger_id) else {
            warn!(
                agent = %self.agent_name,
                ledger_id = %tx.ledger_id,
                "no crypto object for ledger"
            );
            return false;
        };
        let Some(payable) = payable_amount(tx) else {
            warn!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                "payable amount overflows"
            );
            return false;
        };
        match self
            .ledger
            .token_balance(&crypto_object.identifier, &crypto_object.address)
        {
            Ok(balance) => payable <= balance,
            Err(err) => {
                warn!(
                    agent = %self.agent_name,
                    ledger_id = %tx.ledger_id,
                    error = %err,
                    "balance lookup failed"
                );
                false
            }
        }
    }

    fn settle(&self, tx: &TransactionMessage) -> Option<TransactionDigest> {
        if tx.is_off_chain() {
            return Some(TransactionDigest::from(tx.transaction_id.clone()));
        }
        let Some(crypto_object) = self.wallet.crypto_object(&tx.ledger_id) else {
            warn!(
                agent = %self.agent_name,
                ledger_id = %tx.ledger_id,
                "no crypto object for ledger"
            );
            return None;
        };
        let (Some(amount), Some(tx_fee)) = (
            tx.amount.checked_sub(tx.counterparty_tx_fee),
            tx.sender_tx_fee.checked_add(tx.counterparty_tx_fee),
        ) else {
            warn!(
                agent = %self.agent_name,
                transaction_id = %tx.transaction_id,
                "transfer amount overflows"
            );
            return None;
        };
        match self.ledger.transfer(
            &crypto_object.identifier,
            crypto_object,
            &tx.counterparty,
            amount,
            tx_fee,
        ) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(
                    agent = %self.agent_name,
                    transaction_id = %tx.transaction_id,
                    error = %err,
                    "settlement failed"
                );
                None
            }
        }
    }

    // -------------------------------------------------------------------
    // State updates
    // -------------------------------------------------------------------

    fn handle_state_update(&self, update: StateUpdateMessage) {
        match update {
            StateUpdateMessage::Initialize {
                amount_by_currency,
                quantities_by_good_id,
                exchange_params_by_currency,
                utility_params_by_good_id,
                tx_fee,
            } => {
                let mut preferences = Preferences::clone(&self.shared.preferences.load());
                if let Err(err) = preferences.init(
                    exchange_params_by_currency,
                    utility_params_by_good_id,
                    tx_fee,
                    &self.agent_name,
                ) {
                    warn!(agent = %self.agent_name, error = %err, "initialization failed");
                    return;
                }
                let mut ownership = OwnershipState::clone(&self.shared.ownership.load());
                ownership.init(amount_by_currency, quantities_by_good_id, &self.agent_name);

                self.shared.ownership.store(Arc::new(ownership));
                self.shared.preferences.store(Arc::new(preferences));
                if self.shared.readiness.mark_ready() {
                    info!(agent = %self.agent_name, "agent initialized, ready to pursue goals");
                }
            }
            StateUpdateMessage::Apply {
                amount_by_currency,
                quantities_by_good_id,
            } => self.apply_deltas(&amount_by_currency, &quantities_by_good_id),
        }
    }

    fn apply_deltas(&self, amount_deltas: &CurrencyHoldings, quantity_deltas: &GoodHoldings) {
        match self
            .shared
            .ownership
            .load()
            .apply_state_update(amount_deltas, quantity_deltas)
        {
            Ok(next) => {
                self.shared.ownership.store(Arc::new(next));
                debug!(agent = %self.agent_name, "applied state update");
            }
            Err(err) => {
                warn!(agent = %self.agent_name, error = %err, "state update not applied");
            }
        }
    }
}

/// What the agent pays for `tx`: the amount net of the counterparty's fee
/// plus both fees.
fn payable_amount(tx: &TransactionMessage) -> Option<i64> {
    let amount = tx.amount.checked_sub(tx.counterparty_tx_fee)?;
    let fees = tx.sender_tx_fee.checked_add(tx.counterparty_tx_fee)?;
    amount.checked_add(fees)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use agora_types::{Address, CurrencyId, LedgerId, TransactionId};

    use super::*;

    fn tx(amount: i64, sender_fee: i64, counterparty_fee: i64) -> TransactionMessage {
        TransactionMessage {
            performative: TransactionPerformative::Propose,
            transaction_id: TransactionId::new("transaction0"),
            sender: Address::new("me"),
            counterparty: Address::new("them"),
            is_sender_buyer: true,
            currency_id: CurrencyId::new("FET"),
            amount,
            sender_tx_fee: sender_fee,
            counterparty_tx_fee: counterparty_fee,
            quantities_by_good_id: GoodHoldings::new(),
            ledger_id: LedgerId::new("fetchai"),
            info: BTreeMap::new(),
            transaction_digest: None,
        }
    }

    #[test]
    fn payable_nets_out_counterparty_fee() {
        assert_eq!(payable_amount(&tx(10, 1, 1)), Some(11));
        assert_eq!(payable_amount(&tx(10, 2, 0)), Some(12));
        assert_eq!(payable_amount(&tx(i64::MAX, 1, 0)), None);
    }

    #[test]
    fn handle_is_closed_after_drop() {
        let ledger: Arc<dyn LedgerApi> =
            Arc::new(agora_ledger::InMemoryLedger::new(LedgerId::new("fetchai")));
        let (decision_maker, handle, _outbox) = DecisionMaker::new("agent", Wallet::new(), ledger);
        drop(decision_maker);
        let result = handle.send(Envelope::transaction(tx(1, 0, 0)));
        assert!(matches!(result, Err(DecisionMakerError::QueueClosed(_))));
    }
}
