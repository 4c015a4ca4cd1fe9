//! The agent's currency and good holdings.
//!
//! An [`OwnershipState`] starts uninitialized. Once [`init`](OwnershipState::init)
//! has run, both holdings maps are present. Transactions are vetted with
//! [`is_consistent`](OwnershipState::is_consistent) and applied with
//! [`apply`](OwnershipState::apply) or
//! [`apply_state_update`](OwnershipState::apply_state_update), which return
//! a new state and leave the receiver untouched.
//!
//! All quantity arithmetic is checked. A currency or good missing from the
//! holdings reads as zero and is inserted when first updated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use agora_types::{CurrencyHoldings, GoodHoldings, TransactionMessage};

use crate::AgentError;

/// Currency and good holdings of an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipState {
    amount_by_currency: Option<CurrencyHoldings>,
    quantities_by_good_id: Option<GoodHoldings>,
}

impl OwnershipState {
    /// Create an uninitialized state.
    pub const fn new() -> Self {
        Self {
            amount_by_currency: None,
            quantities_by_good_id: None,
        }
    }

    /// Create a state that is already initialized with the given holdings.
    pub const fn with_holdings(
        amount_by_currency: CurrencyHoldings,
        quantities_by_good_id: GoodHoldings,
    ) -> Self {
        Self {
            amount_by_currency: Some(amount_by_currency),
            quantities_by_good_id: Some(quantities_by_good_id),
        }
    }

    /// Set the holdings.
    ///
    /// Initialization is advisory: calling this on a live state replaces
    /// its holdings. Every call logs a warning, since a running agent
    /// should only ever be initialized once.
    pub fn init(
        &mut self,
        amount_by_currency: CurrencyHoldings,
        quantities_by_good_id: GoodHoldings,
        agent_name: &str,
    ) {
        if self.is_initialized() {
            warn!(agent = agent_name, "ownership state re-initialized, previous holdings discarded");
        } else {
            warn!(agent = agent_name, "ownership state is being initialized");
        }
        self.amount_by_currency = Some(amount_by_currency);
        self.quantities_by_good_id = Some(quantities_by_good_id);
    }

    /// Whether both holdings maps are present.
    pub const fn is_initialized(&self) -> bool {
        self.amount_by_currency.is_some() && self.quantities_by_good_id.is_some()
    }

    /// Currency holdings.
    pub const fn amount_by_currency(&self) -> Result<&CurrencyHoldings, AgentError> {
        match &self.amount_by_currency {
            Some(amounts) => Ok(amounts),
            None => Err(AgentError::NotInitialized {
                component: "currency holdings",
            }),
        }
    }

    /// Good holdings.
    pub const fn quantities_by_good_id(&self) -> Result<&GoodHoldings, AgentError> {
        match &self.quantities_by_good_id {
            Some(quantities) => Ok(quantities),
            None => Err(AgentError::NotInitialized {
                component: "good holdings",
            }),
        }
    }

    /// Check whether the current holdings can cover `tx`.
    ///
    /// A buyer needs `amount + sender_tx_fee` of the currency. A seller is
    /// judged on the fee alone: `currency + amount >= sender_tx_fee`. The
    /// goods-sufficiency result is computed and logged but does not take
    /// part in the verdict.
    pub fn is_consistent(&self, tx: &TransactionMessage) -> Result<bool, AgentError> {
        let amounts = self.amount_by_currency()?;
        let quantities = self.quantities_by_good_id()?;
        let held_currency = amounts.get(&tx.currency_id).copied().unwrap_or(0);

        if tx.is_sender_buyer {
            let required = tx
                .amount
                .checked_add(tx.sender_tx_fee)
                .ok_or_else(|| AgentError::overflow("buyer payable"))?;
            return Ok(held_currency >= required);
        }

        let goods_sufficient = tx.quantities_by_good_id.iter().all(|(good_id, requested)| {
            quantities.get(good_id).copied().unwrap_or(0) >= *requested
        });
        let proceeds = held_currency
            .checked_add(tx.amount)
            .ok_or_else(|| AgentError::overflow("seller proceeds"))?;
        let fee_covered = proceeds >= tx.sender_tx_fee;
        if !goods_sufficient {
            debug!(
                transaction_id = %tx.transaction_id,
                fee_covered,
                "seller lacks requested goods, verdict follows fee check"
            );
        }
        Ok(fee_covered)
    }

    /// Apply `tx` to the holdings in place.
    ///
    /// A buyer pays `amount + sender_tx_fee` and receives the goods; a
    /// seller receives `amount - sender_tx_fee` and gives up the goods.
    /// No sufficiency check is performed here.
    pub fn update(&mut self, tx: &TransactionMessage) -> Result<(), AgentError> {
        let currency_delta = if tx.is_sender_buyer {
            tx.amount
                .checked_add(tx.sender_tx_fee)
                .and_then(i64::checked_neg)
                .ok_or_else(|| AgentError::overflow("buyer currency delta"))?
        } else {
            tx.amount
                .checked_sub(tx.sender_tx_fee)
                .ok_or_else(|| AgentError::overflow("seller currency delta"))?
        };

        let mut good_deltas = GoodHoldings::new();
        for (good_id, quantity) in &tx.quantities_by_good_id {
            let delta = if tx.is_sender_buyer {
                *quantity
            } else {
                quantity
                    .checked_neg()
                    .ok_or_else(|| AgentError::overflow(format!("good delta {good_id}")))?
            };
            good_deltas.insert(good_id.clone(), delta);
        }

        let mut currency_deltas = CurrencyHoldings::new();
        currency_deltas.insert(tx.currency_id.clone(), currency_delta);

        let amounts = add_deltas(self.amount_by_currency()?, &currency_deltas)?;
        let quantities = add_deltas(self.quantities_by_good_id()?, &good_deltas)?;
        self.amount_by_currency = Some(amounts);
        self.quantities_by_good_id = Some(quantities);
        Ok(())
    }

    /// Return a new state with every transaction in `transactions` applied
    /// in order. The receiver is not modified.
    pub fn apply(&self, transactions: &[TransactionMessage]) -> Result<Self, AgentError> {
        let mut new_state = self.clone();
        for tx in transactions {
            new_state.update(tx)?;
        }
        Ok(new_state)
    }

    /// Return a new state with the given deltas added to the holdings.
    /// The receiver is not modified.
    pub fn apply_state_update(
        &self,
        amount_deltas_by_currency: &CurrencyHoldings,
        quantity_deltas_by_good_id: &GoodHoldings,
    ) -> Result<Self, AgentError> {
        Ok(Self::with_holdings(
            add_deltas(self.amount_by_currency()?, amount_deltas_by_currency)?,
            add_deltas(self.quantities_by_good_id()?, quantity_deltas_by_good_id)?,
        ))
    }
}

/// Add `deltas` to `holdings`, inserting missing keys at zero.
pub(crate) fn add_deltas<K>(
    holdings: &BTreeMap<K, i64>,
    deltas: &BTreeMap<K, i64>,
) -> Result<BTreeMap<K, i64>, AgentError>
where
    K: Ord + Clone + std::fmt::Display,
{
    let mut result = holdings.clone();
    for (key, delta) in deltas {
        let slot = result.entry(key.clone()).or_insert(0);
        *slot = slot
            .checked_add(*delta)
            .ok_or_else(|| AgentError::overflow(format!("holding {key}")))?;
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_types::{
        Address, CurrencyId, GoodId, LedgerId, TransactionId, TransactionPerformative,
    };

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
            transaction_id: TransactionId::new("tx-1"),
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

    #[test]
    fn uninitialized_access_is_an_error() {
        let state = OwnershipState::new();
        assert!(!state.is_initialized());
        assert_eq!(
            state.amount_by_currency(),
            Err(AgentError::NotInitialized {
                component: "currency holdings"
            })
        );
        assert!(state.is_consistent(&tx(true, 1, 0, 1)).is_err());
        assert!(state.apply(&[tx(true, 1, 0, 1)]).is_err());
    }

    #[test]
    fn init_sets_and_reinit_overwrites() {
        let mut state = OwnershipState::new();
        state.init(CurrencyHoldings::new(), GoodHoldings::new(), "agent");
        assert!(state.is_initialized());
        let mut amounts = CurrencyHoldings::new();
        amounts.insert(CurrencyId::new("FET"), 7);
        state.init(amounts.clone(), GoodHoldings::new(), "agent");
        assert_eq!(state.amount_by_currency().unwrap(), &amounts);
    }

    #[test]
    fn buyer_consistency_threshold() {
        let s = state(10, 0);
        assert!(s.is_consistent(&tx(true, 8, 2, 1)).unwrap());
        assert!(!s.is_consistent(&tx(true, 9, 2, 1)).unwrap());
    }

    #[test]
    fn seller_verdict_follows_fee_check() {
        // Holds no apples but can cover the fee: consistent.
        let s = state(0, 0);
        assert!(s.is_consistent(&tx(false, 5, 3, 4)).unwrap());
        // Fee exceeds currency plus proceeds: inconsistent.
        assert!(!s.is_consistent(&tx(false, 1, 3, 0)).unwrap());
    }

    #[test]
    fn missing_currency_reads_as_zero() {
        let s = OwnershipState::with_holdings(CurrencyHoldings::new(), GoodHoldings::new());
        assert!(!s.is_consistent(&tx(true, 1, 0, 1)).unwrap());
    }

    #[test]
    fn buyer_update_pays_and_receives() {
        let s = state(20, 1);
        let next = s.apply(&[tx(true, 10, 1, 2)]).unwrap();
        assert_eq!(next.amount_by_currency().unwrap()[&CurrencyId::new("FET")], 9);
        assert_eq!(next.quantities_by_good_id().unwrap()[&GoodId::new("apple")], 3);
        // Original untouched.
        assert_eq!(s, state(20, 1));
    }

    #[test]
    fn seller_update_receives_net_of_fee() {
        let s = state(20, 5);
        let next = s.apply(&[tx(false, 10, 1, 2)]).unwrap();
        assert_eq!(next.amount_by_currency().unwrap()[&CurrencyId::new("FET")], 29);
        assert_eq!(next.quantities_by_good_id().unwrap()[&GoodId::new("apple")], 3);
    }

    #[test]
    fn apply_state_update_inserts_missing_keys() {
        let s = state(5, 5);
        let mut goods = GoodHoldings::new();
        goods.insert(GoodId::new("pear"), 2);
        let mut amounts = CurrencyHoldings::new();
        amounts.insert(CurrencyId::new("FET"), -5);
        let next = s.apply_state_update(&amounts, &goods).unwrap();
        assert_eq!(next.amount_by_currency().unwrap()[&CurrencyId::new("FET")], 0);
        assert_eq!(next.quantities_by_good_id().unwrap()[&GoodId::new("pear")], 2);
        assert_eq!(next.quantities_by_good_id().unwrap()[&GoodId::new("apple")], 5);
    }

    #[test]
    fn overflow_is_reported() {
        let s = state(i64::MAX, 0);
        let result = s.apply(&[tx(false, 1, 0, 0)]);
        assert!(matches!(result, Err(AgentError::ArithmeticOverflow { .. })));
    }
}
