//! Error types for the agora-search crate.

use crate::constraint::ConstraintKind;

/// Errors raised while building or decoding search models.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Two attributes of a data model share a name.
    #[error("data model {model}: duplicated attribute name {attribute}")]
    DuplicateAttribute {
        /// The data model being built.
        model: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// A description does not conform to its data model.
    #[error("attribute inconsistency: {0}")]
    AttributeInconsistency(String),

    /// A constraint operand does not fit its kind.
    #[error("invalid operand for constraint {kind}: {reason}")]
    InvalidConstraint {
        /// The constraint kind.
        kind: ConstraintKind,
        /// What is wrong with the operand.
        reason: String,
    },

    /// A constraint expression is structurally invalid.
    #[error("invalid constraint expression: {0}")]
    InvalidExpression(String),

    /// A query is not valid for its data model.
    #[error("query is not valid for data model {model}")]
    InvalidQuery {
        /// Name of the data model the query was checked against.
        model: String,
    },

    /// A constraint kind could not be parsed or decoded.
    #[error("unknown constraint kind: {0}")]
    UnknownConstraintKind(String),

    /// A wire attribute type is out of range.
    #[error("unknown attribute type on the wire: {0}")]
    UnknownAttributeType(i32),

    /// The bytes are not a valid protobuf message.
    #[error("wire decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A required wire field or oneof was absent.
    #[error("missing wire field: {0}")]
    MissingField(&'static str),
}
