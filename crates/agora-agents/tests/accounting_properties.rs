//! Property-based tests for ownership accounting and the fee split.
//!
//! Holdings and amounts are kept well inside `i64` so that no generated
//! case hits the overflow path.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeMap;

use agora_agents::{OwnershipState, split_tx_fees};
use agora_types::{
    Address, CurrencyHoldings, CurrencyId, GoodHoldings, GoodId, LedgerId, TransactionId,
    TransactionMessage, TransactionPerformative,
};
use proptest::prelude::*;

fn state(fet: i64, apples: i64) -> OwnershipState {
    let mut amounts = CurrencyHoldings::new();
    amounts.insert(CurrencyId::new("FET"), fet);
    let mut goods = GoodHoldings::new();
    goods.insert(GoodId::new("apple"), apples);
    OwnershipState::with_holdings(amounts, goods)
}

fn tx(is_sender_buyer: bool, amount: i64, fee: i64, apples: i64) -> TransactionMessage {
    let mut goods = GoodHoldings::new();
    goods.insert(GoodId::new("apple"), apples);
    TransactionMessage {
        performative: TransactionPerformative::Propose,
        transaction_id: TransactionId::generate(),
        sender: Address::new("me"),
        counterparty: Address::new("them"),
        is_sender_buyer,
        currency_id: CurrencyId::new("FET"),
        amount,
        sender_tx_fee: fee,
        counterparty_tx_fee: 0,
        quantities_by_good_id: goods,
        ledger_id: LedgerId::new("fetchai"),
        info: BTreeMap::new(),
        transaction_digest: None,
    }
}

fn arb_tx() -> impl Strategy<Value = TransactionMessage> {
    (any::<bool>(), 0_i64..10_000, 0_i64..100, 0_i64..50)
        .prop_map(|(buyer, amount, fee, apples)| tx(buyer, amount, fee, apples))
}

// =============================================================================
// Fee split
// =============================================================================

proptest! {
    /// The two parts never exceed the total and differ by at most one.
    #[test]
    fn prop_split_is_bounded_and_even(fee in 0_i64..1_000_000_000) {
        let split = split_tx_fees(fee).unwrap();
        prop_assert!(split.buyer_tx_fee + split.seller_tx_fee <= fee);
        prop_assert!((split.buyer_tx_fee - split.seller_tx_fee).abs() <= 1);
        prop_assert!(split.buyer_tx_fee >= 0 && split.seller_tx_fee >= 0);
    }
}

// =============================================================================
// Ownership
// =============================================================================

proptest! {
    /// A buyer can afford the transaction exactly when balance covers
    /// amount plus fee.
    #[test]
    fn prop_buyer_consistency_threshold(amount in 0_i64..10_000, fee in 0_i64..100, slack in 0_i64..100) {
        let covered = state(amount + fee + slack, 0);
        prop_assert!(covered.is_consistent(&tx(true, amount, fee, 1)).unwrap());
        let short = state(amount + fee - 1, 0);
        prop_assert!(!short.is_consistent(&tx(true, amount, fee, 1)).unwrap());
    }

    /// Applying two transactions at once equals applying them one by one,
    /// and neither leaves the original state modified.
    #[test]
    fn prop_sequential_apply_is_associative(
        fet in 0_i64..1_000_000,
        apples in 0_i64..1_000,
        first in arb_tx(),
        second in arb_tx(),
    ) {
        let original = state(fet, apples);
        let snapshot = original.clone();
        let together = original.apply(&[first.clone(), second.clone()]).unwrap();
        let stepwise = original.apply(&[first]).unwrap().apply(&[second]).unwrap();
        prop_assert_eq!(together, stepwise);
        prop_assert_eq!(original, snapshot);
    }

    /// A state update followed by its negation restores the holdings.
    #[test]
    fn prop_state_update_inverts(fet in 0_i64..1_000_000, delta in -1_000_i64..1_000) {
        let original = state(fet, 5);
        let mut forward = CurrencyHoldings::new();
        forward.insert(CurrencyId::new("FET"), delta);
        let mut backward = CurrencyHoldings::new();
        backward.insert(CurrencyId::new("FET"), -delta);
        let restored = original
            .apply_state_update(&forward, &GoodHoldings::new())
            .unwrap()
            .apply_state_update(&backward, &GoodHoldings::new())
            .unwrap();
        prop_assert_eq!(restored, original);
    }
}
