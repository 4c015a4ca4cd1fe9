//! Drain-cycle scenarios for the decision maker against an in-memory ledger.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeMap;
use std::sync::Arc;

use agora_core::decision_maker::{DecisionMaker, DecisionMakerHandle, DrainSummary};
use agora_core::readiness::ReadinessStatus;
use agora_ledger::{InMemoryLedger, LedgerApi, Wallet};
use agora_types::{
    Address, CurrencyHoldings, CurrencyId, Envelope, ExchangeParams, GoodHoldings, GoodId,
    LedgerId, MessageBody, OFF_CHAIN_LEDGER_ID, StateUpdateMessage, TransactionDigest,
    TransactionId, TransactionMessage, TransactionPerformative, UtilityParams,
};
use tokio::sync::mpsc::UnboundedReceiver;

const LEDGER: &str = "fetchai";
const AGENT: &str = "agent_address";
const SELLER: &str = "seller_address";

struct Fixture {
    decision_maker: DecisionMaker,
    handle: DecisionMakerHandle,
    outbox: UnboundedReceiver<TransactionMessage>,
    ledger: Arc<InMemoryLedger>,
}

fn fixture(agent_balance: i64) -> Fixture {
    let ledger = Arc::new(InMemoryLedger::new(LedgerId::new(LEDGER)));
    ledger.mint(&Address::new(AGENT), agent_balance).unwrap();
    ledger.mint(&Address::new(SELLER), 0).unwrap();
    let wallet = Wallet::from_addresses([(LedgerId::new(LEDGER), Address::new(AGENT))]);
    let api: Arc<dyn LedgerApi> = Arc::clone(&ledger) as Arc<dyn LedgerApi>;
    let (decision_maker, handle, outbox) = DecisionMaker::new("buyer", wallet, api);
    Fixture {
        decision_maker,
        handle,
        outbox,
        ledger,
    }
}

fn initialize(fet: i64, apples: i64) -> Envelope {
    let mut amounts = CurrencyHoldings::new();
    amounts.insert(CurrencyId::new("FET"), fet);
    let mut goods = GoodHoldings::new();
    goods.insert(GoodId::new("apple"), apples);
    let mut exchange = ExchangeParams::new();
    exchange.insert(CurrencyId::new("FET"), 1.0);
    let mut utility = UtilityParams::new();
    utility.insert(GoodId::new("apple"), 200.0);
    Envelope::state_update(StateUpdateMessage::Initialize {
        amount_by_currency: amounts,
        quantities_by_good_id: goods,
        exchange_params_by_currency: exchange,
        utility_params_by_good_id: utility,
        tx_fee: 2,
    })
}

fn proposal(ledger_id: &str, is_sender_buyer: bool, amount: i64, apples: i64) -> TransactionMessage {
    let mut goods = GoodHoldings::new();
    goods.insert(GoodId::new("apple"), apples);
    TransactionMessage {
        performative: TransactionPerformative::Propose,
        transaction_id: TransactionId::generate(),
        sender: Address::new(AGENT),
        counterparty: Address::new(SELLER),
        is_sender_buyer,
        currency_id: CurrencyId::new("FET"),
        amount,
        sender_tx_fee: 1,
        counterparty_tx_fee: 0,
        quantities_by_good_id: goods,
        ledger_id: LedgerId::new(ledger_id),
        info: BTreeMap::new(),
        transaction_digest: None,
    }
}

fn run(fixture: &mut Fixture, envelopes: Vec<Envelope>) -> DrainSummary {
    for envelope in envelopes {
        fixture.handle.send(envelope).unwrap();
    }
    fixture.decision_maker.execute()
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn initialize_sets_state_and_readiness() {
    let mut f = fixture(50);
    assert_eq!(f.decision_maker.readiness(), ReadinessStatus::NotReady);
    assert!(!f.handle.is_ready());

    let summary = run(&mut f, vec![initialize(100, 0)]);
    assert_eq!(summary.handled, 1);
    assert_eq!(f.decision_maker.readiness(), ReadinessStatus::Ready);
    assert!(f.handle.is_ready());

    let state = f.handle.ownership_state();
    assert_eq!(
        state.amount_by_currency().unwrap().get(&CurrencyId::new("FET")),
        Some(&100)
    );
    let fees = f.handle.preferences().transaction_fees().unwrap();
    assert_eq!(fees.buyer_tx_fee + fees.seller_tx_fee, 2);
}

#[test]
fn off_chain_proposal_before_initialization_is_accepted_optimistically() {
    let mut f = fixture(0);
    let tx = proposal(OFF_CHAIN_LEDGER_ID, true, 10, 1);
    let summary = run(&mut f, vec![Envelope::transaction(tx.clone())]);
    assert_eq!(summary.accepted, 1);

    let response = f.outbox.try_recv().unwrap();
    assert_eq!(response.performative, TransactionPerformative::Accept);
    assert_eq!(
        response.transaction_digest,
        Some(TransactionDigest::from(tx.transaction_id.clone()))
    );
    assert_eq!(response.transaction_id, tx.transaction_id);
    assert!(f.ledger.transfers().unwrap().is_empty());
}

// =============================================================================
// Transactions
// =============================================================================

#[test]
fn utility_enhancing_affordable_purchase_is_settled() {
    let mut f = fixture(50);
    let tx = proposal(LEDGER, true, 10, 10);
    let summary = run(&mut f, vec![initialize(100, 0), Envelope::transaction(tx.clone())]);
    assert_eq!(
        summary,
        DrainSummary {
            handled: 2,
            dropped: 0,
            accepted: 1,
            rejected: 0,
        }
    );

    let response = f.outbox.try_recv().unwrap();
    assert_eq!(response.performative, TransactionPerformative::Accept);
    let transfers = f.ledger.transfers().unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(response.transaction_digest, Some(transfers.first().unwrap().digest.clone()));
    assert_eq!(
        f.ledger.token_balance(&LedgerId::new(LEDGER), &Address::new(AGENT)).unwrap(),
        39
    );
    assert_eq!(
        f.ledger.token_balance(&LedgerId::new(LEDGER), &Address::new(SELLER)).unwrap(),
        10
    );
}

#[test]
fn utility_decreasing_purchase_is_rejected_without_settlement() {
    let mut f = fixture(1_000);
    let tx = proposal(LEDGER, true, 50, 1);
    let summary = run(&mut f, vec![initialize(100, 0), Envelope::transaction(tx)]);
    assert_eq!(summary.rejected, 1);
    let response = f.outbox.try_recv().unwrap();
    assert_eq!(response.performative, TransactionPerformative::Reject);
    assert_eq!(response.transaction_digest, None);
    assert!(f.ledger.transfers().unwrap().is_empty());
}

#[test]
fn unaffordable_purchase_is_rejected() {
    let mut f = fixture(5);
    let summary = run(
        &mut f,
        vec![
            initialize(100, 0),
            Envelope::transaction(proposal(LEDGER, true, 10, 10)),
        ],
    );
    assert_eq!(summary.rejected, 1);
    assert_eq!(
        f.outbox.try_recv().unwrap().performative,
        TransactionPerformative::Reject
    );
    assert_eq!(
        f.ledger.token_balance(&LedgerId::new(LEDGER), &Address::new(AGENT)).unwrap(),
        5
    );
}

#[test]
fn proposal_on_unknown_ledger_is_rejected() {
    let mut f = fixture(1_000);
    let summary = run(
        &mut f,
        vec![
            initialize(100, 0),
            Envelope::transaction(proposal("cosmos", true, 10, 10)),
        ],
    );
    assert_eq!(summary.rejected, 1);
}

#[test]
fn utility_enhancing_sale_off_chain_is_accepted() {
    let mut f = fixture(0);
    let summary = run(
        &mut f,
        vec![
            initialize(100, 10),
            Envelope::transaction(proposal(OFF_CHAIN_LEDGER_ID, false, 30, 5)),
        ],
    );
    assert_eq!(summary.accepted, 1);
}

#[test]
fn inconsistent_proposal_is_rejected() {
    let mut f = fixture(1_000);
    let mut tx = proposal(OFF_CHAIN_LEDGER_ID, true, 10, 1);
    tx.counterparty = tx.sender.clone();
    let summary = run(&mut f, vec![Envelope::transaction(tx)]);
    assert_eq!(summary.rejected, 1);
}

#[test]
fn affordable_proposal_failing_at_transfer_is_rejected() {
    let mut f = fixture(50);

    // Payable is 1, but the net transfer amount is negative.
    let mut negative_net = proposal(LEDGER, true, 1, 1);
    negative_net.sender_tx_fee = 0;
    negative_net.counterparty_tx_fee = 5;

    // The counterparty is the agent's own address on this ledger.
    let mut to_self = proposal(LEDGER, true, 10, 1);
    to_self.sender = Address::new("agent_oef_address");
    to_self.counterparty = Address::new(AGENT);

    let summary = run(
        &mut f,
        vec![Envelope::transaction(negative_net), Envelope::transaction(to_self)],
    );
    assert_eq!(
        summary,
        DrainSummary {
            handled: 2,
            dropped: 0,
            accepted: 0,
            rejected: 2,
        }
    );
    for _ in 0..2 {
        let response = f.outbox.try_recv().unwrap();
        assert_eq!(response.performative, TransactionPerformative::Reject);
        assert_eq!(response.transaction_digest, None);
    }
    assert!(f.ledger.transfers().unwrap().is_empty());
    assert_eq!(
        f.ledger.token_balance(&LedgerId::new(LEDGER), &Address::new(AGENT)).unwrap(),
        50
    );
}

// =============================================================================
// State updates
// =============================================================================

#[test]
fn apply_swaps_in_a_new_snapshot() {
    let mut f = fixture(0);
    run(&mut f, vec![initialize(100, 3)]);
    let before = f.handle.ownership_state();

    let mut amounts = CurrencyHoldings::new();
    amounts.insert(CurrencyId::new("FET"), -40);
    let mut goods = GoodHoldings::new();
    goods.insert(GoodId::new("pear"), 2);
    run(
        &mut f,
        vec![Envelope::state_update(StateUpdateMessage::Apply {
            amount_by_currency: amounts,
            quantities_by_good_id: goods,
        })],
    );

    let after = f.handle.ownership_state();
    assert_eq!(
        after.amount_by_currency().unwrap().get(&CurrencyId::new("FET")),
        Some(&60)
    );
    assert_eq!(
        after.quantities_by_good_id().unwrap().get(&GoodId::new("pear")),
        Some(&2)
    );
    assert_eq!(
        before.amount_by_currency().unwrap().get(&CurrencyId::new("FET")),
        Some(&100)
    );
}

#[test]
fn apply_before_initialize_leaves_state_untouched() {
    let mut f = fixture(0);
    let summary = run(
        &mut f,
        vec![Envelope::state_update(StateUpdateMessage::Apply {
            amount_by_currency: CurrencyHoldings::new(),
            quantities_by_good_id: GoodHoldings::new(),
        })],
    );
    assert_eq!(summary.handled, 1);
    assert!(!f.handle.ownership_state().is_initialized());
    assert_eq!(f.decision_maker.readiness(), ReadinessStatus::NotReady);
}

// =============================================================================
// Queue handling
// =============================================================================

#[test]
fn foreign_protocol_and_unknown_bodies_are_dropped() {
    let mut f = fixture(0);
    let foreign = Envelope {
        protocol_id: "fipa".to_owned(),
        body: MessageBody::Transaction(Box::new(proposal(OFF_CHAIN_LEDGER_ID, true, 1, 1))),
    };
    let unknown: Envelope =
        serde_json::from_str(r#"{"protocol_id":"internal","body":{"kind":"ping"}}"#).unwrap();
    assert_eq!(unknown.body, MessageBody::Unknown);

    let summary = run(&mut f, vec![foreign, unknown]);
    assert_eq!(summary.handled, 2);
    assert_eq!(summary.dropped, 2);
    assert!(f.outbox.try_recv().is_err());
}

#[test]
fn max_reactions_leaves_the_rest_queued() {
    let Fixture {
        decision_maker,
        handle,
        outbox: _outbox,
        ..
    } = fixture(0);
    let mut decision_maker = decision_maker.with_max_reactions(2);
    for _ in 0..5 {
        handle
            .send(Envelope::transaction(proposal(OFF_CHAIN_LEDGER_ID, true, 1, 1)))
            .unwrap();
    }
    assert_eq!(decision_maker.execute().handled, 2);
    assert_eq!(decision_maker.execute().handled, 2);
    assert_eq!(decision_maker.execute().handled, 1);
    assert_eq!(decision_maker.execute().handled, 0);
}

#[tokio::test]
async fn concurrent_producers_are_drained_in_one_cycle() {
    let mut f = fixture(0);
    let mut producers = Vec::new();
    for _ in 0..4 {
        let handle = f.handle.clone();
        producers.push(tokio::spawn(async move {
            for _ in 0..25 {
                handle
                    .send(Envelope::transaction(proposal(OFF_CHAIN_LEDGER_ID, true, 1, 1)))
                    .unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    let summary = f.decision_maker.execute();
    assert_eq!(summary.handled, 100);
    assert_eq!(summary.accepted, 100);
    let mut responses = 0;
    while f.outbox.try_recv().is_ok() {
        responses += 1;
    }
    assert_eq!(responses, 100);
}
