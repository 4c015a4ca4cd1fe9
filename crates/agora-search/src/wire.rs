//! Protobuf messages of the search wire format.
//!
//! Mirrors `proto/models.proto` (the nested `Query.*` messages, flattened
//! into this module). Field tags and types define the bytes on the wire;
//! the Rust names follow what `prost-build` would emit.
//!
//! Conversions to and from the domain types live in [`crate::codec`].

// Derive-generated accessors and enum helpers carry no docs.
#![allow(missing_docs, clippy::derive_partial_eq_without_eq)]

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// `Query.Attribute`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    /// Attribute name.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Declared type, an [`attribute::Type`].
    #[prost(enumeration = "attribute::Type", tag = "2")]
    pub r#type: i32,
    /// Whether the attribute is required.
    #[prost(bool, tag = "3")]
    pub required: bool,
    /// Free-text description.
    #[prost(string, tag = "4")]
    pub description: ::prost::alloc::string::String,
}

/// Nested types of [`Attribute`].
pub mod attribute {
    /// `Query.Attribute.Type`
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        /// `DOUBLE`
        Double = 0,
        /// `INT`
        Int = 1,
        /// `BOOL`
        Bool = 2,
        /// `STRING`
        String = 3,
        /// `LOCATION`
        Location = 4,
    }
}

/// `Query.DataModel`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataModel {
    /// Model name.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Attributes, sorted by name.
    #[prost(message, repeated, tag = "2")]
    pub attributes: ::prost::alloc::vec::Vec<Attribute>,
    /// Free-text description.
    #[prost(string, tag = "3")]
    pub description: ::prost::alloc::string::String,
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// `Query.Location`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Location {
    /// Longitude in degrees.
    #[prost(double, tag = "1")]
    pub lon: f64,
    /// Latitude in degrees.
    #[prost(double, tag = "2")]
    pub lat: f64,
}

/// `Query.Value`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Value {
    /// The typed value.
    #[prost(oneof = "value::Value", tags = "1, 2, 3, 4, 5")]
    pub value: ::core::option::Option<value::Value>,
}

/// Nested types of [`Value`].
pub mod value {
    /// `Query.Value.value`
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        /// String value.
        #[prost(string, tag = "1")]
        S(::prost::alloc::string::String),
        /// Double value.
        #[prost(double, tag = "2")]
        D(f64),
        /// Bool value.
        #[prost(bool, tag = "3")]
        B(bool),
        /// Int value.
        #[prost(int64, tag = "4")]
        I(i64),
        /// Location value.
        #[prost(message, tag = "5")]
        L(super::Location),
    }
}

/// `Query.KeyValue`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyValue {
    /// Attribute name.
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    /// Attribute value.
    #[prost(message, optional, tag = "2")]
    pub value: ::core::option::Option<Value>,
}

/// `Query.Instance`: a description on the wire.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Instance {
    /// The description's data model.
    #[prost(message, optional, tag = "1")]
    pub model: ::core::option::Option<DataModel>,
    /// The description's values.
    #[prost(message, repeated, tag = "2")]
    pub values: ::prost::alloc::vec::Vec<KeyValue>,
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// `Query.StringPair`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringPair {
    /// Lower bound.
    #[prost(string, tag = "1")]
    pub first: ::prost::alloc::string::String,
    /// Upper bound.
    #[prost(string, tag = "2")]
    pub second: ::prost::alloc::string::String,
}

/// `Query.IntPair`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct IntPair {
    /// Lower bound.
    #[prost(int64, tag = "1")]
    pub first: i64,
    /// Upper bound.
    #[prost(int64, tag = "2")]
    pub second: i64,
}

/// `Query.DoublePair`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct DoublePair {
    /// Lower bound.
    #[prost(double, tag = "1")]
    pub first: f64,
    /// Upper bound.
    #[prost(double, tag = "2")]
    pub second: f64,
}

/// `Query.LocationPair`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct LocationPair {
    /// First location.
    #[prost(message, optional, tag = "1")]
    pub first: ::core::option::Option<Location>,
    /// Second location.
    #[prost(message, optional, tag = "2")]
    pub second: ::core::option::Option<Location>,
}

/// `Query.Range`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Range {
    /// The typed pair.
    #[prost(oneof = "range::Pair", tags = "1, 2, 3, 4")]
    pub pair: ::core::option::Option<range::Pair>,
}

/// Nested types of [`Range`].
pub mod range {
    /// `Query.Range.pair`
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Pair {
        /// String bounds.
        #[prost(message, tag = "1")]
        S(super::StringPair),
        /// Int bounds.
        #[prost(message, tag = "2")]
        I(super::IntPair),
        /// Double bounds.
        #[prost(message, tag = "3")]
        D(super::DoublePair),
        /// Location bounds.
        #[prost(message, tag = "4")]
        L(super::LocationPair),
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// `Query.Distance`
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Distance {
    /// Reference point.
    #[prost(message, optional, tag = "1")]
    pub center: ::core::option::Option<Location>,
    /// Maximum distance in kilometres.
    #[prost(double, tag = "2")]
    pub distance: f64,
}

/// `Query.Relation`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Relation {
    /// Comparison operator, a [`relation::Operator`].
    #[prost(enumeration = "relation::Operator", tag = "1")]
    pub op: i32,
    /// Right-hand side.
    #[prost(message, optional, tag = "2")]
    pub val: ::core::option::Option<Value>,
}

/// Nested types of [`Relation`].
pub mod relation {
    /// `Query.Relation.Operator`
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Operator {
        /// `==`
        Eq = 0,
        /// `<`
        Lt = 1,
        /// `<=`
        Lteq = 2,
        /// `>`
        Gt = 3,
        /// `>=`
        Gteq = 4,
        /// `!=`
        Noteq = 5,
    }
}

/// `Query.Set`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Set {
    /// Membership operator, a [`set::Operator`].
    #[prost(enumeration = "set::Operator", tag = "1")]
    pub op: i32,
    /// Candidate values.
    #[prost(message, optional, tag = "2")]
    pub vals: ::core::option::Option<set::Values>,
}

/// Nested types of [`Set`].
pub mod set {
    /// `Query.Set.Operator`
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Operator {
        /// `in`
        In = 0,
        /// `not_in`
        Notin = 1,
    }

    /// `Query.Set.Values`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Values {
        /// The typed members.
        #[prost(oneof = "values::Values", tags = "1, 2, 3, 4, 5")]
        pub values: ::core::option::Option<values::Values>,
    }

    /// Nested types of [`Values`].
    pub mod values {
        /// `Query.Set.Values.Ints`
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Ints {
            /// Members.
            #[prost(int64, repeated, tag = "1")]
            pub vals: ::prost::alloc::vec::Vec<i64>,
        }

        /// `Query.Set.Values.Doubles`
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Doubles {
            /// Members.
            #[prost(double, repeated, tag = "1")]
            pub vals: ::prost::alloc::vec::Vec<f64>,
        }

        /// `Query.Set.Values.Strings`
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Strings {
            /// Members.
            #[prost(string, repeated, tag = "1")]
            pub vals: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        }

        /// `Query.Set.Values.Bools`
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Bools {
            /// Members.
            #[prost(bool, repeated, tag = "1")]
            pub vals: ::prost::alloc::vec::Vec<bool>,
        }

        /// `Query.Set.Values.Locations`
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Locations {
            /// Members.
            #[prost(message, repeated, tag = "1")]
            pub vals: ::prost::alloc::vec::Vec<super::super::Location>,
        }

        /// `Query.Set.Values.values`
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Values {
            /// String members.
            #[prost(message, tag = "1")]
            S(Strings),
            /// Double members.
            #[prost(message, tag = "2")]
            D(Doubles),
            /// Bool members.
            #[prost(message, tag = "3")]
            B(Bools),
            /// Int members.
            #[prost(message, tag = "4")]
            I(Ints),
            /// Location members.
            #[prost(message, tag = "5")]
            L(Locations),
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions and queries
// ---------------------------------------------------------------------------

/// `Query.ConstraintExpr`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConstraintExpr {
    /// The expression node.
    #[prost(oneof = "constraint_expr::Expression", tags = "1, 2, 3, 4")]
    pub expression: ::core::option::Option<constraint_expr::Expression>,
}

/// Nested types of [`ConstraintExpr`].
pub mod constraint_expr {
    /// `Query.ConstraintExpr.Or`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Or {
        /// Disjuncts.
        #[prost(message, repeated, tag = "1")]
        pub expr: ::prost::alloc::vec::Vec<super::ConstraintExpr>,
    }

    /// `Query.ConstraintExpr.And`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct And {
        /// Conjuncts.
        #[prost(message, repeated, tag = "1")]
        pub expr: ::prost::alloc::vec::Vec<super::ConstraintExpr>,
    }

    /// `Query.ConstraintExpr.Not`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Not {
        /// The negated expression.
        #[prost(message, optional, boxed, tag = "1")]
        pub expr: ::core::option::Option<::prost::alloc::boxed::Box<super::ConstraintExpr>>,
    }

    /// `Query.ConstraintExpr.Constraint`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Constraint {
        /// The constrained attribute.
        #[prost(string, tag = "1")]
        pub attribute_name: ::prost::alloc::string::String,
        /// The predicate.
        #[prost(oneof = "constraint::Constraint", tags = "2, 3, 4, 5")]
        pub constraint: ::core::option::Option<constraint::Constraint>,
    }

    /// Nested types of [`Constraint`].
    pub mod constraint {
        /// `Query.ConstraintExpr.Constraint.constraint`
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Constraint {
            /// Set membership.
            #[prost(message, tag = "2")]
            Set(super::super::Set),
            /// Inclusive range.
            #[prost(message, tag = "3")]
            Range(super::super::Range),
            /// Relation to a scalar.
            #[prost(message, tag = "4")]
            Relation(super::super::Relation),
            /// Distance from a point.
            #[prost(message, tag = "5")]
            Distance(super::super::Distance),
        }
    }

    /// `Query.ConstraintExpr.expression`
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Expression {
        /// Disjunction.
        #[prost(message, tag = "1")]
        Or(Or),
        /// Conjunction.
        #[prost(message, tag = "2")]
        And(And),
        /// Negation.
        #[prost(message, tag = "3")]
        Not(::prost::alloc::boxed::Box<Not>),
        /// Leaf constraint.
        #[prost(message, tag = "4")]
        Constraint(Constraint),
    }
}

/// `Query.Model`: a query on the wire.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Model {
    /// Top-level conjuncts.
    #[prost(message, repeated, tag = "1")]
    pub constraints: ::prost::alloc::vec::Vec<ConstraintExpr>,
    /// Optional data model.
    #[prost(message, optional, tag = "2")]
    pub model: ::core::option::Option<DataModel>,
}
