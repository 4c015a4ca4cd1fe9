//! An in-memory ledger: account balances plus an append-only transfer log.
//!
//! The [`InMemoryLedger`] serves exactly one ledger id. It is used by the
//! engine binary and by tests that need a real [`LedgerApi`] behind the
//! decision maker.
//!
//! # Design
//!
//! - **Append-only**: transfer records are never modified or deleted.
//! - **Fees burn**: a transfer debits `amount + fee` and credits `amount`.
//! - **Conservation**: minted supply == balances + burned fees, always.
//! - **Integers only**: all arithmetic is checked `i64`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use agora_types::{Address, LedgerId, TransactionDigest};

use crate::conservation::{verify_supply, ConservationResult};
use crate::{CryptoObject, LedgerApi, LedgerError, TransferBuilder, TransferRecord};

// ---------------------------------------------------------------------------
// Book
// ---------------------------------------------------------------------------

/// The mutable part of the ledger, guarded by a single lock.
#[derive(Debug, Default)]
struct Book {
    balances: BTreeMap<Address, i64>,
    minted: i64,
    log: Vec<TransferRecord>,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// A thread-safe, single-ledger, in-memory token ledger.
#[derive(Debug)]
pub struct InMemoryLedger {
    ledger_id: LedgerId,
    book: Mutex<Book>,
}

impl InMemoryLedger {
    /// Create an empty ledger serving `ledger_id`.
    pub fn new(ledger_id: LedgerId) -> Self {
        Self {
            ledger_id,
            book: Mutex::new(Book::default()),
        }
    }

    /// The ledger id this backend serves.
    pub const fn ledger_id(&self) -> &LedgerId {
        &self.ledger_id
    }

    fn lock(&self) -> Result<MutexGuard<'_, Book>, LedgerError> {
        self.book
            .lock()
            .map_err(|e| LedgerError::LockPoisoned(e.to_string()))
    }

    fn check_ledger(&self, identifier: &LedgerId) -> Result<(), LedgerError> {
        if identifier == &self.ledger_id {
            Ok(())
        } else {
            Err(LedgerError::UnknownLedger(identifier.clone()))
        }
    }

    /// Create `amount` new tokens in `address`'s account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] for a negative amount and
    /// [`LedgerError::ArithmeticOverflow`] if the balance or total supply
    /// would overflow.
    pub fn mint(&self, address: &Address, amount: i64) -> Result<i64, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let mut book = self.lock()?;
        let minted = book
            .minted
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("minted supply"))?;
        let balance = book.balances.get(address).copied().unwrap_or(0);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("mint balance"))?;
        book.minted = minted;
        book.balances.insert(address.clone(), new_balance);
        debug!(ledger_id = %self.ledger_id, %address, amount, "tokens minted");
        Ok(new_balance)
    }

    /// Current balance of `address`, or `None` if it never held tokens.
    pub fn balance(&self, address: &Address) -> Result<Option<i64>, LedgerError> {
        Ok(self.lock()?.balances.get(address).copied())
    }

    /// A copy of the transfer log, in settlement order.
    pub fn transfers(&self) -> Result<Vec<TransferRecord>, LedgerError> {
        Ok(self.lock()?.log.clone())
    }

    /// Total tokens ever minted.
    pub fn minted(&self) -> Result<i64, LedgerError> {
        Ok(self.lock()?.minted)
    }

    /// Verify that minted supply equals balances plus burned fees.
    pub fn verify_conservation(&self) -> Result<ConservationResult, LedgerError> {
        let book = self.lock()?;
        let result = verify_supply(&self.ledger_id, book.minted, &book.balances, &book.log);
        if let ConservationResult::Anomaly(anomaly) = &result {
            warn!(
                ledger_id = %anomaly.ledger_id,
                minted = anomaly.minted,
                circulating = anomaly.circulating,
                burned_fees = anomaly.burned_fees,
                "supply conservation violated"
            );
        }
        Ok(result)
    }
}

impl LedgerApi for InMemoryLedger {
    fn token_balance(&self, identifier: &LedgerId, address: &Address) -> Result<i64, LedgerError> {
        self.check_ledger(identifier)?;
        self.lock()?
            .balances
            .get(address)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAccount {
                ledger_id: identifier.clone(),
                address: address.clone(),
            })
    }

    fn transfer(
        &self,
        identifier: &LedgerId,
        crypto_object: &CryptoObject,
        destination: &Address,
        amount: i64,
        tx_fee: i64,
    ) -> Result<TransactionDigest, LedgerError> {
        self.check_ledger(identifier)?;
        self.check_ledger(&crypto_object.identifier)?;

        let record = TransferBuilder::new(identifier.clone())
            .from(crypto_object.address.clone())
            .to(destination.clone())
            .amount(amount)
            .fee(tx_fee)
            .build()?;
        let required = record
            .total_debit()
            .ok_or(LedgerError::ArithmeticOverflow("transfer total"))?;

        let mut book = self.lock()?;
        let available = book.balances.get(&record.from).copied().unwrap_or(0);
        if available < required {
            return Err(LedgerError::InsufficientBalance {
                address: record.from,
                required,
                available,
            });
        }
        let from_balance = available
            .checked_sub(required)
            .ok_or(LedgerError::ArithmeticOverflow("sender balance"))?;
        let to_balance = book
            .balances
            .get(&record.to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow("receiver balance"))?;

        book.balances.insert(record.from.clone(), from_balance);
        book.balances.insert(record.to.clone(), to_balance);

        let digest = record.digest.clone();
        debug!(
            ledger_id = %record.ledger_id,
            from = %record.from,
            to = %record.to,
            amount,
            fee = tx_fee,
            %digest,
            "transfer settled"
        );
        book.log.push(record);
        Ok(digest)
    }
}
