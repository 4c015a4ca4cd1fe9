//! Supply conservation verification for the in-memory ledger.
//!
//! Tokens enter a ledger only through minting and leave it only as fees.
//! Transfers move tokens between accounts without creating or destroying
//! them, so at any point the following must hold:
//!
//! ```text
//! minted == sum(balances) + sum(fees)
//! ```
//!
//! A violation produces a [`SupplyAnomaly`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agora_types::{Address, LedgerId};

use crate::TransferRecord;

/// The result of a supply conservation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Minted supply equals circulating supply plus burned fees.
    Balanced,
    /// The books do not add up.
    Anomaly(SupplyAnomaly),
}

impl ConservationResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Details of a failed supply conservation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyAnomaly {
    /// The ledger that failed the check.
    pub ledger_id: LedgerId,
    /// Total tokens ever minted.
    pub minted: i64,
    /// Sum of all account balances.
    pub circulating: i64,
    /// Sum of all fees charged by logged transfers.
    pub burned_fees: i64,
}

/// Verify that `minted` equals the sum of `balances` plus every fee in `log`.
///
/// An accumulator overflow is itself reported as an anomaly, with the
/// saturated totals.
pub fn verify_supply(
    ledger_id: &LedgerId,
    minted: i64,
    balances: &BTreeMap<Address, i64>,
    log: &[TransferRecord],
) -> ConservationResult {
    let circulating = balances
        .values()
        .try_fold(0_i64, |acc, balance| acc.checked_add(*balance));
    let burned_fees = log
        .iter()
        .try_fold(0_i64, |acc, record| acc.checked_add(record.fee));

    let balanced = match (circulating, burned_fees) {
        (Some(c), Some(f)) => c.checked_add(f) == Some(minted),
        _ => false,
    };

    if balanced {
        ConservationResult::Balanced
    } else {
        ConservationResult::Anomaly(SupplyAnomaly {
            ledger_id: ledger_id.clone(),
            minted,
            circulating: circulating.unwrap_or(i64::MAX),
            burned_fees: burned_fees.unwrap_or(i64::MAX),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TransferBuilder;

    fn record(fee: i64) -> TransferRecord {
        TransferBuilder::new(LedgerId::new("fetchai"))
            .from(Address::new("a"))
            .to(Address::new("b"))
            .amount(5)
            .fee(fee)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_ledger_is_balanced() {
        let result = verify_supply(&LedgerId::new("fetchai"), 0, &BTreeMap::new(), &[]);
        assert!(result.is_balanced());
    }

    #[test]
    fn fees_account_for_missing_supply() {
        let mut balances = BTreeMap::new();
        balances.insert(Address::new("a"), 93);
        balances.insert(Address::new("b"), 5);
        let log = vec![record(2)];
        let result = verify_supply(&LedgerId::new("fetchai"), 100, &balances, &log);
        assert_eq!(result, ConservationResult::Balanced);
    }

    #[test]
    fn missing_tokens_are_an_anomaly() {
        let mut balances = BTreeMap::new();
        balances.insert(Address::new("a"), 90);
        let result = verify_supply(&LedgerId::new("fetchai"), 100, &balances, &[]);
        let ConservationResult::Anomaly(anomaly) = result else {
            panic!("expected anomaly");
        };
        assert_eq!(anomaly.minted, 100);
        assert_eq!(anomaly.circulating, 90);
        assert_eq!(anomaly.burned_fees, 0);
    }
}
