//! Transfer builders and validation for the in-memory ledger.
//!
//! Provides a [`TransferBuilder`] that enforces the transfer invariants:
//! both endpoints set and distinct, a non-negative amount and a
//! non-negative fee. Builders validate inputs before producing a
//! [`TransferRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_types::{Address, LedgerId, TransactionDigest};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Transfer record
// ---------------------------------------------------------------------------

/// One settled transfer, as stored in the ledger's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Digest identifying this transfer.
    pub digest: TransactionDigest,
    /// The ledger the transfer settled on.
    pub ledger_id: LedgerId,
    /// Paying address.
    pub from: Address,
    /// Receiving address.
    pub to: Address,
    /// Tokens credited to the receiver.
    pub amount: i64,
    /// Tokens burned as fee, paid by the sender on top of `amount`.
    pub fee: i64,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Total debited from the sender: amount plus fee.
    pub const fn total_debit(&self) -> Option<i64> {
        self.amount.checked_add(self.fee)
    }
}

// ---------------------------------------------------------------------------
// Transfer builder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`TransferRecord`] values.
///
/// # Examples
///
/// ```
/// use agora_ledger::TransferBuilder;
/// use agora_types::{Address, LedgerId};
///
/// let record = TransferBuilder::new(LedgerId::new("fetchai"))
///     .from(Address::new("alice"))
///     .to(Address::new("bob"))
///     .amount(10)
///     .fee(1)
///     .build();
///
/// assert!(record.is_ok());
/// ```
#[derive(Debug)]
pub struct TransferBuilder {
    ledger_id: LedgerId,
    from: Option<Address>,
    to: Option<Address>,
    amount: Option<i64>,
    fee: i64,
}

impl TransferBuilder {
    /// Start building a transfer on the given ledger.
    pub const fn new(ledger_id: LedgerId) -> Self {
        Self {
            ledger_id,
            from: None,
            to: None,
            amount: None,
            fee: 0,
        }
    }

    /// Set the paying address.
    #[must_use]
    pub fn from(mut self, address: Address) -> Self {
        self.from = Some(address);
        self
    }

    /// Set the receiving address.
    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.to = Some(address);
        self
    }

    /// Set the amount credited to the receiver.
    #[must_use]
    pub const fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the fee (defaults to zero).
    #[must_use]
    pub const fn fee(mut self, fee: i64) -> Self {
        self.fee = fee;
        self
    }

    /// Validate inputs and produce a [`TransferRecord`] with a fresh digest.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if an endpoint or the amount
    /// is not set, [`LedgerError::InvalidAmount`] / [`LedgerError::InvalidFee`]
    /// for negative values, and [`LedgerError::SelfTransfer`] when both
    /// endpoints are the same address.
    pub fn build(self) -> Result<TransferRecord, LedgerError> {
        let from = self.from.ok_or(LedgerError::MissingField("from"))?;
        let to = self.to.ok_or(LedgerError::MissingField("to"))?;
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;

        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if self.fee < 0 {
            return Err(LedgerError::InvalidFee(self.fee));
        }
        if from == to {
            return Err(LedgerError::SelfTransfer(from));
        }

        Ok(TransferRecord {
            digest: TransactionDigest::new(format!("0x{}", Uuid::now_v7().simple())),
            ledger_id: self.ledger_id,
            from,
            to,
            amount,
            fee: self.fee,
            created_at: Utc::now(),
        })
    }
}
