//! The agent's wallet: one crypto object per ledger.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agora_types::{Address, LedgerId};

/// The agent's identity on a single ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CryptoObject {
    /// The ledger this identity belongs to.
    pub identifier: LedgerId,
    /// The agent's address on that ledger.
    pub address: Address,
}

impl CryptoObject {
    /// Create a crypto object for `address` on ledger `identifier`.
    pub const fn new(identifier: LedgerId, address: Address) -> Self {
        Self {
            identifier,
            address,
        }
    }
}

/// A collection of crypto objects keyed by ledger id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    crypto_objects: BTreeMap<LedgerId, CryptoObject>,
}

impl Wallet {
    /// Create an empty wallet.
    pub const fn new() -> Self {
        Self {
            crypto_objects: BTreeMap::new(),
        }
    }

    /// Build a wallet from `(ledger id, address)` pairs.
    pub fn from_addresses<I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = (LedgerId, Address)>,
    {
        let mut wallet = Self::new();
        for (ledger_id, address) in addresses {
            wallet.insert(CryptoObject::new(ledger_id, address));
        }
        wallet
    }

    /// Add or replace the crypto object for its ledger.
    pub fn insert(&mut self, crypto_object: CryptoObject) -> Option<CryptoObject> {
        self.crypto_objects
            .insert(crypto_object.identifier.clone(), crypto_object)
    }

    /// Look up the crypto object for a ledger.
    pub fn crypto_object(&self, ledger_id: &LedgerId) -> Option<&CryptoObject> {
        self.crypto_objects.get(ledger_id)
    }

    /// Addresses by ledger id.
    pub fn addresses(&self) -> BTreeMap<LedgerId, Address> {
        self.crypto_objects
            .iter()
            .map(|(id, obj)| (id.clone(), obj.address.clone()))
            .collect()
    }

    /// Number of ledgers the wallet holds an identity on.
    pub fn len(&self) -> usize {
        self.crypto_objects.len()
    }

    /// Whether the wallet holds no identities.
    pub fn is_empty(&self) -> bool {
        self.crypto_objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_ledger_id() {
        let wallet = Wallet::from_addresses([
            (LedgerId::new("fetchai"), Address::new("fetch1abc")),
            (LedgerId::new("ethereum"), Address::new("0xabc")),
        ]);
        assert_eq!(wallet.len(), 2);
        let obj = wallet.crypto_object(&LedgerId::new("ethereum"));
        assert_eq!(obj.map(|o| o.address.as_str()), Some("0xabc"));
        assert!(wallet.crypto_object(&LedgerId::new("cosmos")).is_none());
    }

    #[test]
    fn insert_replaces_existing_identity() {
        let mut wallet = Wallet::new();
        wallet.insert(CryptoObject::new(LedgerId::new("fetchai"), Address::new("a")));
        let previous =
            wallet.insert(CryptoObject::new(LedgerId::new("fetchai"), Address::new("b")));
        assert_eq!(previous.map(|o| o.address), Some(Address::new("a")));
        assert_eq!(wallet.len(), 1);
    }
}
