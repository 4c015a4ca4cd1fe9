//! Typed leaf predicates over a single attribute value.
//!
//! A [`ConstraintType`] pairs a [`ConstraintKind`] with an [`Operand`]
//! whose shape depends on the kind:
//!
//! | Kind | Operand |
//! |------|---------|
//! | `==`, `!=` | scalar bool, int, double or string |
//! | `<`, `<=`, `>`, `>=` | scalar int, double or string |
//! | `within` | inclusive range of two ints, doubles or strings |
//! | `in`, `not_in` | set of values of a single type |
//! | `distance` | center location and maximum distance in km |
//!
//! The shape is validated when the constraint type is built. Checking a
//! value evaluates `value OP operand`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::SearchError;
use crate::attribute::{Attribute, AttributeType, AttributeValue};
use crate::location::Location;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The ten kinds of constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEq,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEq,
    /// `within`
    Within,
    /// `in`
    In,
    /// `not_in`
    NotIn,
    /// `distance`
    Distance,
}

impl ConstraintKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Equal,
        Self::NotEqual,
        Self::LessThan,
        Self::LessThanEq,
        Self::GreaterThan,
        Self::GreaterThanEq,
        Self::Within,
        Self::In,
        Self::NotIn,
        Self::Distance,
    ];

    /// The symbolic form of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanEq => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEq => ">=",
            Self::Within => "within",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Distance => "distance",
        }
    }

    /// Whether this kind compares against a single scalar.
    pub const fn is_relation(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanEq
                | Self::GreaterThan
                | Self::GreaterThanEq
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SearchError::UnknownConstraintKind(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Operand
// ---------------------------------------------------------------------------

/// The right-hand side of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value, for relations.
    Scalar(AttributeValue),
    /// Inclusive lower and upper bound, for `within`.
    Range(AttributeValue, AttributeValue),
    /// Candidate values, for `in` and `not_in`.
    Set(Vec<AttributeValue>),
    /// Center and maximum distance in kilometres, for `distance`.
    Distance {
        /// Reference point.
        center: Location,
        /// Maximum distance from `center`, in kilometres.
        distance: f64,
    },
}

impl Operand {
    /// A scalar operand.
    pub fn scalar(value: impl Into<AttributeValue>) -> Self {
        Self::Scalar(value.into())
    }

    /// An inclusive range operand.
    pub fn range(low: impl Into<AttributeValue>, high: impl Into<AttributeValue>) -> Self {
        Self::Range(low.into(), high.into())
    }

    /// A set operand.
    pub fn set<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        Self::Set(values.into_iter().map(Into::into).collect())
    }

    /// A distance operand.
    pub const fn distance(center: Location, distance: f64) -> Self {
        Self::Distance { center, distance }
    }

    /// The type of the data the operand is defined over.
    ///
    /// For a set this is the type of its first member; an empty set has no
    /// data type.
    pub fn data_type(&self) -> Option<AttributeType> {
        match self {
            Self::Scalar(value) | Self::Range(value, _) => Some(value.attribute_type()),
            Self::Set(values) => values.first().map(AttributeValue::attribute_type),
            Self::Distance { .. } => Some(AttributeType::Location),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Range(low, high) => write!(f, "({low}, {high})"),
            Self::Set(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            Self::Distance { center, distance } => write!(f, "({center}, {distance})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Constraint type
// ---------------------------------------------------------------------------

/// A validated pairing of a [`ConstraintKind`] and an [`Operand`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintType {
    kind: ConstraintKind,
    operand: Operand,
}

impl ConstraintType {
    /// Build a constraint type, validating the operand against the kind.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConstraint`] when the operand's shape
    /// or type is not allowed for `kind`, or when a set mixes types.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_search::{Attribute, AttributeType, AttributeValue, ConstraintKind, ConstraintType, Operand};
    ///
    /// let after_2000 = ConstraintType::new(ConstraintKind::GreaterThan, Operand::scalar(2000_i64)).unwrap();
    /// assert!(after_2000.is_valid(&Attribute::new("year", AttributeType::Int, true)));
    /// assert!(after_2000.check(&AttributeValue::Int(2005)));
    /// assert!(!after_2000.check(&AttributeValue::Int(1990)));
    ///
    /// assert!(ConstraintType::new(ConstraintKind::LessThan, Operand::scalar(true)).is_err());
    /// ```
    pub fn new(kind: ConstraintKind, operand: Operand) -> Result<Self, SearchError> {
        validate(kind, &operand)?;
        Ok(Self { kind, operand })
    }

    /// Parse the kind from its symbolic form and build the constraint type.
    pub fn parse(kind: &str, operand: Operand) -> Result<Self, SearchError> {
        Self::new(kind.parse()?, operand)
    }

    /// The constraint kind.
    pub const fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// The operand.
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }

    /// The type of the data the constraint is defined over.
    pub fn data_type(&self) -> Option<AttributeType> {
        self.operand.data_type()
    }

    /// Whether the constraint can apply to `attribute`: the operand's data
    /// type must equal the attribute's declared type.
    pub fn is_valid(&self, attribute: &Attribute) -> bool {
        self.data_type() == Some(attribute.attribute_type)
    }

    /// Whether `value` satisfies the constraint.
    ///
    /// Values of a different type than the operand never satisfy an
    /// ordering, range or membership test, and always satisfy `!=` and
    /// `not_in`.
    pub fn check(&self, value: &AttributeValue) -> bool {
        let ordering = |operand: &AttributeValue| value.compare(operand);
        match (self.kind, &self.operand) {
            (ConstraintKind::Equal, Operand::Scalar(operand)) => value.matches(operand),
            (ConstraintKind::NotEqual, Operand::Scalar(operand)) => !value.matches(operand),
            (ConstraintKind::LessThan, Operand::Scalar(operand)) => {
                ordering(operand) == Some(Ordering::Less)
            }
            (ConstraintKind::LessThanEq, Operand::Scalar(operand)) => {
                matches!(ordering(operand), Some(Ordering::Less | Ordering::Equal))
            }
            (ConstraintKind::GreaterThan, Operand::Scalar(operand)) => {
                ordering(operand) == Some(Ordering::Greater)
            }
            (ConstraintKind::GreaterThanEq, Operand::Scalar(operand)) => {
                matches!(ordering(operand), Some(Ordering::Greater | Ordering::Equal))
            }
            (ConstraintKind::Within, Operand::Range(low, high)) => {
                matches!(ordering(low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(ordering(high), Some(Ordering::Less | Ordering::Equal))
            }
            (ConstraintKind::In, Operand::Set(members)) => {
                members.iter().any(|member| value.matches(member))
            }
            (ConstraintKind::NotIn, Operand::Set(members)) => {
                !members.iter().any(|member| value.matches(member))
            }
            (ConstraintKind::Distance, Operand::Distance { center, distance }) => match value {
                AttributeValue::Location(location) => center.distance(location) <= *distance,
                _ => false,
            },
            // Construction rejects every other pairing.
            _ => false,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstraintType(value={},type={})", self.operand, self.kind)
    }
}

fn invalid(kind: ConstraintKind, reason: impl Into<String>) -> SearchError {
    SearchError::InvalidConstraint {
        kind,
        reason: reason.into(),
    }
}

fn validate(kind: ConstraintKind, operand: &Operand) -> Result<(), SearchError> {
    match (kind, operand) {
        (ConstraintKind::Equal | ConstraintKind::NotEqual, Operand::Scalar(value)) => {
            if value.attribute_type() == AttributeType::Location {
                return Err(invalid(
                    kind,
                    "expected one of bool, int, double, string, got location",
                ));
            }
            Ok(())
        }
        (
            ConstraintKind::LessThan
            | ConstraintKind::LessThanEq
            | ConstraintKind::GreaterThan
            | ConstraintKind::GreaterThanEq,
            Operand::Scalar(value),
        ) => match value.attribute_type() {
            AttributeType::Int | AttributeType::Double | AttributeType::String => Ok(()),
            other => Err(invalid(
                kind,
                format!("expected one of int, double, string, got {other}"),
            )),
        },
        (ConstraintKind::Within, Operand::Range(low, high)) => {
            let (low_type, high_type) = (low.attribute_type(), high.attribute_type());
            if low_type != high_type {
                return Err(invalid(
                    kind,
                    format!("range bounds have different types: {low_type} and {high_type}"),
                ));
            }
            match low_type {
                AttributeType::Int | AttributeType::Double | AttributeType::String => Ok(()),
                other => Err(invalid(
                    kind,
                    format!("expected a range of int, double or string, got {other}"),
                )),
            }
        }
        (ConstraintKind::In | ConstraintKind::NotIn, Operand::Set(values)) => {
            let mut types = values.iter().map(AttributeValue::attribute_type);
            match types.next() {
                Some(first) if types.any(|t| t != first) => {
                    Err(invalid(kind, "set members have different types"))
                }
                _ => Ok(()),
            }
        }
        (ConstraintKind::Distance, Operand::Distance { .. }) => Ok(()),
        (_, other) => Err(invalid(
            kind,
            format!("operand {other} has the wrong shape for this kind"),
        )),
    }
}
