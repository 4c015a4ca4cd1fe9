//! Service descriptions and constraint queries for the Agora agent framework.
//!
//! Agents advertise what they offer as a [`Description`]: typed attribute
//! values conforming to a [`DataModel`]. Buyers look for sellers with a
//! [`Query`], a conjunction of [`ConstraintExpr`] trees whose leaves are
//! typed predicates ([`ConstraintType`]) on one attribute each.
//!
//! # Modules
//!
//! - [`location`] -- Points on the globe and haversine distance.
//! - [`attribute`] -- Attribute types, values and schema entries.
//! - [`data_model`] -- Named schemas of attributes.
//! - [`description`] -- Attribute values checked against a data model.
//! - [`constraint`] -- Leaf predicates: relations, ranges, sets, distance.
//! - [`expression`] -- Boolean composition of constraints.
//! - [`query`] -- Top-level conjunction, optionally bound to a model.
//! - [`wire`] / [`codec`] -- Protobuf messages and the [`WireFormat`] codec.
//! - [`directory`] -- [`ServiceDirectory`] matching queries to agents.
//! - [`error`] -- [`SearchError`].
//!
//! # Usage
//!
//! ```
//! use agora_search::{
//!     Constraint, ConstraintKind, ConstraintType, Description, Operand, Query, WireFormat,
//! };
//!
//! let book = Description::from_values("book", [("year", 1986_i64)]);
//! let recent = ConstraintType::new(ConstraintKind::GreaterThan, Operand::scalar(1980_i64)).unwrap();
//! let query = Query::new(vec![Constraint::new("year", recent).into()], None).unwrap();
//! assert!(query.check(&book));
//!
//! let decoded = Query::decode(&query.encode()).unwrap();
//! assert_eq!(decoded, query);
//! ```

pub mod attribute;
pub mod codec;
pub mod constraint;
pub mod data_model;
pub mod description;
pub mod directory;
pub mod error;
pub mod expression;
pub mod location;
pub mod query;
pub mod wire;

// Re-export primary types at crate root for convenience.
pub use attribute::{Attribute, AttributeType, AttributeValue};
pub use codec::WireFormat;
pub use constraint::{ConstraintKind, ConstraintType, Operand};
pub use data_model::{DataModel, generate_data_model};
pub use description::Description;
pub use directory::ServiceDirectory;
pub use error::SearchError;
pub use expression::{Constraint, ConstraintExpr};
pub use location::{EARTH_RADIUS_KM, Location, haversine};
pub use query::Query;
