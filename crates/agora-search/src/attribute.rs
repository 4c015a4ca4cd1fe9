//! Attribute schema entries and attribute values.

use std::cmp::Ordering;
use std::fmt;

use crate::location::Location;

// ---------------------------------------------------------------------------
// Attribute types and values
// ---------------------------------------------------------------------------

/// The type an attribute is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeType {
    /// A boolean flag.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// A double-precision float.
    Double,
    /// A UTF-8 string.
    String,
    /// A geographic location.
    Location,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Location => "location",
        };
        f.write_str(name)
    }
}

/// A concrete attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A double-precision float.
    Double(f64),
    /// A UTF-8 string.
    String(String),
    /// A geographic location.
    Location(Location),
}

impl AttributeValue {
    /// The runtime type of this value.
    pub const fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Bool(_) => AttributeType::Bool,
            Self::Int(_) => AttributeType::Int,
            Self::Double(_) => AttributeType::Double,
            Self::String(_) => AttributeType::String,
            Self::Location(_) => AttributeType::Location,
        }
    }

    /// Compare two values of the same type.
    ///
    /// Returns `None` for values of different types, for NaN, and for two
    /// distinct locations (locations are only equal or unordered).
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Location(a), Self::Location(b)) => {
                let same = a.latitude.partial_cmp(&b.latitude) == Some(Ordering::Equal)
                    && a.longitude.partial_cmp(&b.longitude) == Some(Ordering::Equal);
                same.then_some(Ordering::Equal)
            }
            _ => None,
        }
    }

    /// Whether two values have the same type and compare equal.
    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Location(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Location> for AttributeValue {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// One typed entry of a [`DataModel`](crate::DataModel).
///
/// Equality ignores the free-text description.
#[derive(Debug, Clone, Eq)]
pub struct Attribute {
    /// Attribute name, unique within its data model.
    pub name: String,
    /// Declared value type.
    pub attribute_type: AttributeType,
    /// Whether every description must carry a value for it.
    pub is_required: bool,
    /// Human-readable explanation.
    pub description: String,
}

impl Attribute {
    /// Create an attribute with an empty description.
    pub fn new(name: impl Into<String>, attribute_type: AttributeType, is_required: bool) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            is_required,
            description: String::new(),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attribute_type == other.attribute_type
            && self.is_required == other.is_required
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attribute(name={},type={},is_required={})",
            self.name, self.attribute_type, self.is_required
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_same_type_only() {
        assert_eq!(
            AttributeValue::Int(3).compare(&AttributeValue::Int(5)),
            Some(Ordering::Less)
        );
        assert_eq!(AttributeValue::Int(3).compare(&AttributeValue::Double(3.0)), None);
        assert!(AttributeValue::from("a").matches(&AttributeValue::from("a")));
        assert!(!AttributeValue::Bool(true).matches(&AttributeValue::Int(1)));
    }

    #[test]
    fn locations_are_equal_or_unordered() {
        let a = AttributeValue::Location(Location::new(1.0, 2.0));
        let b = AttributeValue::Location(Location::new(1.0, 2.5));
        assert_eq!(a.compare(&a), Some(Ordering::Equal));
        assert_eq!(a.compare(&b), None);
    }

    #[test]
    fn attribute_equality_ignores_description() {
        let a = Attribute::new("year", AttributeType::Int, true).with_description("publication year");
        let b = Attribute::new("year", AttributeType::Int, true);
        assert_eq!(a, b);
        assert_ne!(a, Attribute::new("year", AttributeType::Int, false));
    }
}
