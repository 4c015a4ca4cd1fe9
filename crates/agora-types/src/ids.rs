//! Type-safe string identifiers.
//!
//! Currencies, goods, ledgers, addresses and transactions are all named by
//! strings on the wire. Wrapping each in its own newtype prevents passing a
//! good identifier where a currency is expected. Every identifier borrows as
//! [`str`], so maps keyed by an identifier can be queried with a literal.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier of a currency (e.g. `"FET"`).
    CurrencyId
}

define_id! {
    /// Identifier of a tradeable good.
    GoodId
}

define_id! {
    /// Identifier of a ledger (e.g. `"fetchai"`, or the off-chain sentinel).
    LedgerId
}

define_id! {
    /// Address of an agent or account on a ledger.
    Address
}

define_id! {
    /// Identifier of a proposed transaction.
    TransactionId
}

define_id! {
    /// Digest returned by a ledger once a transfer has been submitted.
    TransactionDigest
}

impl TransactionId {
    /// Generate a fresh, time-ordered transaction identifier.
    pub fn generate() -> Self {
        Self(format!("tx-{}", Uuid::now_v7()))
    }
}

impl From<TransactionId> for TransactionDigest {
    /// Off-chain settlement reuses the transaction id as its digest.
    fn from(id: TransactionId) -> Self {
        Self(id.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let currency = CurrencyId::new("FET");
        let good = GoodId::new("FET");
        // Same text, different types -- the compiler enforces no mixing.
        assert_eq!(currency.as_str(), good.as_str());
    }

    #[test]
    fn map_lookup_by_str() {
        let mut holdings = BTreeMap::new();
        holdings.insert(CurrencyId::from("FET"), 10_i64);
        assert_eq!(holdings.get("FET"), Some(&10));
        assert_eq!(holdings.get("ETH"), None);
    }

    #[test]
    fn id_serializes_transparently() {
        let id = LedgerId::new("fetchai");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"fetchai\""));
    }

    #[test]
    fn generated_transaction_ids_are_unique() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tx-"));
    }

    #[test]
    fn digest_from_transaction_id() {
        let digest = TransactionDigest::from(TransactionId::new("transaction0"));
        assert_eq!(digest.to_string(), "transaction0");
    }
}
