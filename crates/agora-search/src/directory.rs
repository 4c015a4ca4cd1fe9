//! Service directory: agents register descriptions, buyers search them.
//!
//! Each agent address maps to the descriptions it currently advertises.
//! A search returns every address with at least one description that
//! satisfies the query, in address order and without duplicates.

use std::collections::BTreeMap;

use agora_types::Address;
use tracing::debug;

use crate::description::Description;
use crate::query::Query;

/// In-memory index of advertised service descriptions.
#[derive(Debug, Clone, Default)]
pub struct ServiceDirectory {
    /// Descriptions indexed by the advertising agent.
    services: BTreeMap<Address, Vec<Description>>,
}

impl ServiceDirectory {
    /// Create an empty directory.
    pub const fn new() -> Self {
        Self {
            services: BTreeMap::new(),
        }
    }

    /// Advertise `description` for `address`.
    ///
    /// Returns `false` if the same description was already registered for
    /// that address.
    pub fn register(&mut self, address: Address, description: Description) -> bool {
        let entries = self.services.entry(address.clone()).or_default();
        if entries.contains(&description) {
            debug!(agent = %address, model = description.data_model().name(), "description already registered");
            return false;
        }
        debug!(agent = %address, model = description.data_model().name(), "registered description");
        entries.push(description);
        true
    }

    /// Withdraw one description. Returns whether it was registered.
    pub fn unregister(&mut self, address: &Address, description: &Description) -> bool {
        let Some(entries) = self.services.get_mut(address) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|d| d != description);
        let removed = entries.len() < before;
        if entries.is_empty() {
            self.services.remove(address);
        }
        if removed {
            debug!(agent = %address, model = description.data_model().name(), "unregistered description");
        }
        removed
    }

    /// Withdraw every description of `address`. Returns how many were
    /// removed.
    pub fn unregister_agent(&mut self, address: &Address) -> usize {
        self.services.remove(address).map_or(0, |entries| entries.len())
    }

    /// Addresses whose descriptions satisfy `query`, sorted and
    /// deduplicated.
    pub fn search(&self, query: &Query) -> Vec<Address> {
        let matches: Vec<Address> = self
            .services
            .iter()
            .filter(|(_, entries)| entries.iter().any(|d| query.check(d)))
            .map(|(address, _)| address.clone())
            .collect();
        debug!(
            agents = self.services.len(),
            matches = matches.len(),
            "searched service directory"
        );
        matches
    }

    /// Descriptions advertised by `address`.
    pub fn descriptions(&self, address: &Address) -> &[Description] {
        self.services.get(address).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of agents with at least one description.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no agent is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;
    use crate::constraint::{ConstraintKind, ConstraintType, Operand};
    use crate::expression::Constraint;

    fn weather(city: &str, wind: bool) -> Description {
        Description::from_values("weather", [
            ("city", AttributeValue::from(city)),
            ("wind", AttributeValue::from(wind)),
        ])
    }

    fn query(kind: ConstraintKind, name: &str, operand: Operand) -> Query {
        let constraint = Constraint::new(name, ConstraintType::new(kind, operand).unwrap());
        Query::new(vec![constraint.into()], None).unwrap()
    }

    #[test]
    fn search_returns_sorted_unique_matches() {
        let mut directory = ServiceDirectory::new();
        directory.register(Address::new("zed"), weather("London", true));
        directory.register(Address::new("amy"), weather("Paris", true));
        directory.register(Address::new("amy"), weather("London", false));
        directory.register(Address::new("bob"), weather("Rome", false));

        let london = query(ConstraintKind::Equal, "city", Operand::scalar("London"));
        assert_eq!(
            directory.search(&london),
            vec![Address::new("amy"), Address::new("zed")]
        );
        let windy = query(ConstraintKind::Equal, "wind", Operand::scalar(true));
        assert_eq!(
            directory.search(&windy),
            vec![Address::new("amy"), Address::new("zed")]
        );
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut directory = ServiceDirectory::new();
        assert!(directory.register(Address::new("a"), weather("London", true)));
        assert!(!directory.register(Address::new("a"), weather("London", true)));
        assert_eq!(directory.descriptions(&Address::new("a")).len(), 1);
    }

    #[test]
    fn unregister_removes_matches() {
        let mut directory = ServiceDirectory::new();
        let london = weather("London", true);
        directory.register(Address::new("a"), london.clone());
        directory.register(Address::new("b"), london.clone());
        assert!(directory.unregister(&Address::new("a"), &london));
        assert!(!directory.unregister(&Address::new("a"), &london));
        assert_eq!(directory.len(), 1);

        let q = query(ConstraintKind::Equal, "city", Operand::scalar("London"));
        assert_eq!(directory.search(&q), vec![Address::new("b")]);
        assert_eq!(directory.unregister_agent(&Address::new("b")), 1);
        assert!(directory.is_empty());
        assert_eq!(directory.unregister_agent(&Address::new("b")), 0);
        assert!(directory.search(&q).is_empty());
    }
}
