//! Ledger and wallet capabilities for the Agora agent framework.
//!
//! The decision maker never talks to a concrete chain. It consumes two
//! capabilities defined here:
//!
//! - [`LedgerApi`] -- balance lookup and transfer submission.
//! - [`Wallet`] -- lookup of the agent's [`CryptoObject`] for a ledger id.
//!
//! An [`InMemoryLedger`] implements [`LedgerApi`] for tests and for the
//! engine binary. It keeps an append-only transfer log and can verify that
//! token supply is conserved.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`InMemoryLedger`]: balances plus append-only log.
//! - [`transfer`] -- The [`TransferBuilder`] for validated transfer records.
//! - [`conservation`] -- Supply conservation verification.
//! - [`wallet`] -- [`Wallet`] and [`CryptoObject`].
//!
//! # Usage
//!
//! ```
//! use agora_ledger::{CryptoObject, InMemoryLedger, LedgerApi};
//! use agora_ledger::conservation::ConservationResult;
//! use agora_types::{Address, LedgerId};
//!
//! let ledger = InMemoryLedger::new(LedgerId::new("fetchai"));
//! let alice = Address::new("alice");
//! let bob = Address::new("bob");
//! ledger.mint(&alice, 100).ok();
//!
//! let crypto = CryptoObject::new(LedgerId::new("fetchai"), alice.clone());
//! let digest = ledger.transfer(&LedgerId::new("fetchai"), &crypto, &bob, 40, 2);
//! assert!(digest.is_ok());
//! assert_eq!(ledger.token_balance(&LedgerId::new("fetchai"), &alice).ok(), Some(58));
//! assert_eq!(ledger.verify_conservation().ok(), Some(ConservationResult::Balanced));
//! ```

pub mod conservation;
pub mod ledger;
pub mod transfer;
pub mod wallet;

// Re-export primary types at crate root.
pub use conservation::{ConservationResult, SupplyAnomaly};
pub use ledger::InMemoryLedger;
pub use transfer::{TransferBuilder, TransferRecord};
pub use wallet::{CryptoObject, Wallet};

use agora_types::{Address, LedgerId, TransactionDigest};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when querying or transferring on a ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The request named a ledger this backend does not serve.
    #[error("unknown ledger: {0}")]
    UnknownLedger(LedgerId),

    /// The address has never held a balance on this ledger.
    #[error("unknown account {address} on ledger {ledger_id}")]
    UnknownAccount {
        /// The ledger that was queried.
        ledger_id: LedgerId,
        /// The address that was not found.
        address: Address,
    },

    /// The source account cannot cover amount plus fee.
    #[error("insufficient balance for {address}: required {required}, available {available}")]
    InsufficientBalance {
        /// The paying address.
        address: Address,
        /// Amount plus fee.
        required: i64,
        /// Current balance.
        available: i64,
    },

    /// Transfer amounts must not be negative.
    #[error("transfer amount must be non-negative, got {0}")]
    InvalidAmount(i64),

    /// Transfer fees must not be negative.
    #[error("transfer fee must be non-negative, got {0}")]
    InvalidFee(i64),

    /// Source and destination are the same address.
    #[error("cannot transfer from {0} to itself")]
    SelfTransfer(Address),

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A balance computation overflowed.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// The ledger's internal lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned: {0}")]
    LockPoisoned(String),
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A ledger the agent can query and settle transactions on.
///
/// Implementations may block on network I/O. Failures are returned as
/// [`LedgerError`]; callers that need an optional digest (the decision
/// maker) turn an error into "no digest".
pub trait LedgerApi: Send + Sync {
    /// Return the token balance of `address` on the ledger `identifier`.
    fn token_balance(&self, identifier: &LedgerId, address: &Address) -> Result<i64, LedgerError>;

    /// Transfer `amount` tokens plus `tx_fee` from the crypto object's
    /// address to `destination`, returning the transaction digest.
    fn transfer(
        &self,
        identifier: &LedgerId,
        crypto_object: &CryptoObject,
        destination: &Address,
        amount: i64,
        tx_fee: i64,
    ) -> Result<TransactionDigest, LedgerError>;
}
