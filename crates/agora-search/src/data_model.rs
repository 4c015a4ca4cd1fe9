//! Data models: named, ordered schemas of typed attributes.

use std::collections::BTreeMap;
use std::fmt;

use crate::SearchError;
use crate::attribute::{Attribute, AttributeValue};

/// A named schema of attributes, sorted by attribute name.
///
/// Equality compares the name and the attributes; the free-text
/// description is ignored.
#[derive(Debug, Clone, Eq)]
pub struct DataModel {
    name: String,
    attributes: Vec<Attribute>,
    description: String,
}

impl DataModel {
    /// Build a data model, sorting `attributes` by name.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::DuplicateAttribute`] if two attributes share
    /// a name.
    pub fn new(name: impl Into<String>, mut attributes: Vec<Attribute>) -> Result<Self, SearchError> {
        let name = name.into();
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        let duplicate = attributes.windows(2).find_map(|pair| match pair {
            [a, b] if a.name == b.name => Some(a.name.clone()),
            _ => None,
        });
        if let Some(attribute) = duplicate {
            return Err(SearchError::DuplicateAttribute {
                model: name,
                attribute,
            });
        }
        Ok(Self {
            name,
            attributes,
            description: String::new(),
        })
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes, sorted by name.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .binary_search_by(|a| a.name.as_str().cmp(name))
            .ok()
            .and_then(|index| self.attributes.get(index))
    }
}

impl PartialEq for DataModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attributes == other.attributes
    }
}

impl fmt::Display for DataModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataModel(name={},attributes=[", self.name)?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{attribute}")?;
        }
        write!(f, "],description={})", self.description)
    }
}

/// Synthesize a data model from values: one required attribute per value,
/// typed from the value.
pub fn generate_data_model(
    name: impl Into<String>,
    values: &BTreeMap<String, AttributeValue>,
) -> DataModel {
    // Map keys are unique and iterate in order, so the attributes are
    // already sorted and free of duplicates.
    let attributes = values
        .iter()
        .map(|(key, value)| Attribute::new(key.clone(), value.attribute_type(), true))
        .collect();
    DataModel {
        name: name.into(),
        attributes,
        description: String::new(),
    }
}
