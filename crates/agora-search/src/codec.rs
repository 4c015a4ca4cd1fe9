//! Conversions between the domain types and the protobuf wire messages.
//!
//! Every encodable entity implements [`WireFormat`]. Decoding validates
//! the result the same way the constructors do, so a decoded value is
//! always one that could have been built directly.

use std::collections::BTreeMap;

use prost::Message;

use crate::SearchError;
use crate::attribute::{Attribute, AttributeType, AttributeValue};
use crate::constraint::{ConstraintKind, ConstraintType, Operand};
use crate::data_model::DataModel;
use crate::description::Description;
use crate::expression::{Constraint, ConstraintExpr};
use crate::location::Location;
use crate::query::Query;
use crate::wire;

/// A domain value with a protobuf representation.
pub trait WireFormat: Sized {
    /// The protobuf message carrying this value.
    type Wire: Message + Default;

    /// Convert to the wire message.
    fn to_wire(&self) -> Self::Wire;

    /// Convert from the wire message, validating the result.
    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError>;

    /// Serialize to protobuf bytes.
    fn encode(&self) -> Vec<u8> {
        self.to_wire().encode_to_vec()
    }

    /// Parse protobuf bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Decode`] for malformed bytes, or the error of
    /// [`WireFormat::from_wire`] for a well-formed message that does not
    /// describe a valid value.
    fn decode(bytes: &[u8]) -> Result<Self, SearchError> {
        Self::from_wire(Self::Wire::decode(bytes)?)
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

impl WireFormat for Location {
    type Wire = wire::Location;

    fn to_wire(&self) -> Self::Wire {
        wire::Location {
            lon: self.longitude,
            lat: self.latitude,
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        Ok(Self::new(wire.lat, wire.lon))
    }
}

fn location_field(location: Option<wire::Location>, field: &'static str) -> Result<Location, SearchError> {
    let location = location.ok_or(SearchError::MissingField(field))?;
    Location::from_wire(location)
}

// ---------------------------------------------------------------------------
// Values and attributes
// ---------------------------------------------------------------------------

fn value_to_wire(value: &AttributeValue) -> wire::Value {
    use wire::value::Value as V;
    let value = match value {
        AttributeValue::Bool(b) => V::B(*b),
        AttributeValue::Int(i) => V::I(*i),
        AttributeValue::Double(d) => V::D(*d),
        AttributeValue::String(s) => V::S(s.clone()),
        AttributeValue::Location(l) => V::L(l.to_wire()),
    };
    wire::Value { value: Some(value) }
}

fn value_from_wire(value: Option<wire::Value>, field: &'static str) -> Result<AttributeValue, SearchError> {
    use wire::value::Value as V;
    let value = value
        .and_then(|v| v.value)
        .ok_or(SearchError::MissingField(field))?;
    Ok(match value {
        V::B(b) => AttributeValue::Bool(b),
        V::I(i) => AttributeValue::Int(i),
        V::D(d) => AttributeValue::Double(d),
        V::S(s) => AttributeValue::String(s),
        V::L(l) => AttributeValue::Location(Location::from_wire(l)?),
    })
}

const fn type_to_wire(attribute_type: AttributeType) -> wire::attribute::Type {
    match attribute_type {
        AttributeType::Bool => wire::attribute::Type::Bool,
        AttributeType::Int => wire::attribute::Type::Int,
        AttributeType::Double => wire::attribute::Type::Double,
        AttributeType::String => wire::attribute::Type::String,
        AttributeType::Location => wire::attribute::Type::Location,
    }
}

fn type_from_wire(raw: i32) -> Result<AttributeType, SearchError> {
    let wire_type =
        wire::attribute::Type::try_from(raw).map_err(|e| SearchError::UnknownAttributeType(e.0))?;
    Ok(match wire_type {
        wire::attribute::Type::Bool => AttributeType::Bool,
        wire::attribute::Type::Int => AttributeType::Int,
        wire::attribute::Type::Double => AttributeType::Double,
        wire::attribute::Type::String => AttributeType::String,
        wire::attribute::Type::Location => AttributeType::Location,
    })
}

impl WireFormat for Attribute {
    type Wire = wire::Attribute;

    fn to_wire(&self) -> Self::Wire {
        wire::Attribute {
            name: self.name.clone(),
            r#type: type_to_wire(self.attribute_type).into(),
            required: self.is_required,
            description: self.description.clone(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        Ok(Self::new(wire.name, type_from_wire(wire.r#type)?, wire.required)
            .with_description(wire.description))
    }
}

impl WireFormat for DataModel {
    type Wire = wire::DataModel;

    fn to_wire(&self) -> Self::Wire {
        wire::DataModel {
            name: self.name().to_owned(),
            attributes: self.attributes().iter().map(Attribute::to_wire).collect(),
            description: self.description().to_owned(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        let attributes = wire
            .attributes
            .into_iter()
            .map(Attribute::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(wire.name, attributes)?.with_description(wire.description))
    }
}

impl WireFormat for Description {
    type Wire = wire::Instance;

    fn to_wire(&self) -> Self::Wire {
        wire::Instance {
            model: Some(self.data_model().to_wire()),
            values: self
                .values()
                .iter()
                .map(|(key, value)| wire::KeyValue {
                    key: key.clone(),
                    value: Some(value_to_wire(value)),
                })
                .collect(),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        let model = wire.model.ok_or(SearchError::MissingField("Instance.model"))?;
        let values = wire
            .values
            .into_iter()
            .map(|kv| Ok((kv.key, value_from_wire(kv.value, "KeyValue.value")?)))
            .collect::<Result<BTreeMap<_, _>, SearchError>>()?;
        Self::new(values, Some(DataModel::from_wire(model)?))
    }
}

// ---------------------------------------------------------------------------
// Constraint types
// ---------------------------------------------------------------------------

fn relation_op(kind: ConstraintKind) -> Option<wire::relation::Operator> {
    use wire::relation::Operator as Op;
    Some(match kind {
        ConstraintKind::Equal => Op::Eq,
        ConstraintKind::NotEqual => Op::Noteq,
        ConstraintKind::LessThan => Op::Lt,
        ConstraintKind::LessThanEq => Op::Lteq,
        ConstraintKind::GreaterThan => Op::Gt,
        ConstraintKind::GreaterThanEq => Op::Gteq,
        _ => return None,
    })
}

fn relation_kind(raw: i32) -> Result<ConstraintKind, SearchError> {
    use wire::relation::Operator as Op;
    let op = Op::try_from(raw)
        .map_err(|e| SearchError::UnknownConstraintKind(format!("relation operator {}", e.0)))?;
    Ok(match op {
        Op::Eq => ConstraintKind::Equal,
        Op::Noteq => ConstraintKind::NotEqual,
        Op::Lt => ConstraintKind::LessThan,
        Op::Lteq => ConstraintKind::LessThanEq,
        Op::Gt => ConstraintKind::GreaterThan,
        Op::Gteq => ConstraintKind::GreaterThanEq,
    })
}

fn set_kind(raw: i32) -> Result<ConstraintKind, SearchError> {
    use wire::set::Operator as Op;
    let op = Op::try_from(raw)
        .map_err(|e| SearchError::UnknownConstraintKind(format!("set operator {}", e.0)))?;
    Ok(match op {
        Op::In => ConstraintKind::In,
        Op::Notin => ConstraintKind::NotIn,
    })
}

fn range_to_wire(low: &AttributeValue, high: &AttributeValue) -> wire::Range {
    use wire::range::Pair;
    let pair = match (low, high) {
        (AttributeValue::Int(first), AttributeValue::Int(second)) => Pair::I(wire::IntPair {
            first: *first,
            second: *second,
        }),
        (AttributeValue::Double(first), AttributeValue::Double(second)) => {
            Pair::D(wire::DoublePair {
                first: *first,
                second: *second,
            })
        }
        (AttributeValue::Location(first), AttributeValue::Location(second)) => {
            Pair::L(wire::LocationPair {
                first: Some(first.to_wire()),
                second: Some(second.to_wire()),
            })
        }
        (AttributeValue::String(first), AttributeValue::String(second)) => {
            Pair::S(wire::StringPair {
                first: first.clone(),
                second: second.clone(),
            })
        }
        // Construction rejects mixed and bool ranges.
        (first, second) => Pair::S(wire::StringPair {
            first: first.to_string(),
            second: second.to_string(),
        }),
    };
    wire::Range { pair: Some(pair) }
}

fn range_from_wire(range: wire::Range) -> Result<Operand, SearchError> {
    use wire::range::Pair;
    Ok(match range.pair.ok_or(SearchError::MissingField("Range.pair"))? {
        Pair::S(p) => Operand::range(p.first, p.second),
        Pair::I(p) => Operand::range(p.first, p.second),
        Pair::D(p) => Operand::range(p.first, p.second),
        Pair::L(p) => Operand::range(
            location_field(p.first, "LocationPair.first")?,
            location_field(p.second, "LocationPair.second")?,
        ),
    })
}

fn set_to_wire(members: &[AttributeValue]) -> wire::set::Values {
    use wire::set::values::{self as v, Values};
    let values = match members.first().map(AttributeValue::attribute_type) {
        Some(AttributeType::Int) => Values::I(v::Ints {
            vals: members
                .iter()
                .filter_map(|m| match m {
                    AttributeValue::Int(i) => Some(*i),
                    _ => None,
                })
                .collect(),
        }),
        Some(AttributeType::Double) => Values::D(v::Doubles {
            vals: members
                .iter()
                .filter_map(|m| match m {
                    AttributeValue::Double(d) => Some(*d),
                    _ => None,
                })
                .collect(),
        }),
        Some(AttributeType::Bool) => Values::B(v::Bools {
            vals: members
                .iter()
                .filter_map(|m| match m {
                    AttributeValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        }),
        Some(AttributeType::Location) => Values::L(v::Locations {
            vals: members
                .iter()
                .filter_map(|m| match m {
                    AttributeValue::Location(l) => Some(l.to_wire()),
                    _ => None,
                })
                .collect(),
        }),
        // An empty set travels as an empty list of strings.
        Some(AttributeType::String) | None => Values::S(v::Strings {
            vals: members
                .iter()
                .filter_map(|m| match m {
                    AttributeValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
        }),
    };
    wire::set::Values { values: Some(values) }
}

fn set_from_wire(values: Option<wire::set::Values>) -> Result<Operand, SearchError> {
    use wire::set::values::Values;
    let values = values
        .and_then(|v| v.values)
        .ok_or(SearchError::MissingField("Set.vals"))?;
    Ok(match values {
        Values::S(s) => Operand::set(s.vals),
        Values::D(d) => Operand::set(d.vals),
        Values::B(b) => Operand::set(b.vals),
        Values::I(i) => Operand::set(i.vals),
        Values::L(l) => Operand::Set(
            l.vals
                .into_iter()
                .map(|loc| Location::from_wire(loc).map(AttributeValue::Location))
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn constraint_type_to_wire(constraint_type: &ConstraintType) -> wire::constraint_expr::constraint::Constraint {
    use wire::constraint_expr::constraint::Constraint as C;
    let kind = constraint_type.kind();
    match constraint_type.operand() {
        Operand::Scalar(value) => C::Relation(wire::Relation {
            op: relation_op(kind).unwrap_or(wire::relation::Operator::Eq).into(),
            val: Some(value_to_wire(value)),
        }),
        Operand::Range(low, high) => C::Range(range_to_wire(low, high)),
        Operand::Set(members) => C::Set(wire::Set {
            op: if kind == ConstraintKind::NotIn {
                wire::set::Operator::Notin
            } else {
                wire::set::Operator::In
            }
            .into(),
            vals: Some(set_to_wire(members)),
        }),
        Operand::Distance { center, distance } => C::Distance(wire::Distance {
            center: Some(center.to_wire()),
            distance: *distance,
        }),
    }
}

fn constraint_type_from_wire(
    constraint: wire::constraint_expr::constraint::Constraint,
) -> Result<ConstraintType, SearchError> {
    use wire::constraint_expr::constraint::Constraint as C;
    match constraint {
        C::Relation(relation) => ConstraintType::new(
            relation_kind(relation.op)?,
            Operand::Scalar(value_from_wire(relation.val, "Relation.val")?),
        ),
        C::Range(range) => ConstraintType::new(ConstraintKind::Within, range_from_wire(range)?),
        C::Set(set) => ConstraintType::new(set_kind(set.op)?, set_from_wire(set.vals)?),
        C::Distance(distance) => ConstraintType::new(
            ConstraintKind::Distance,
            Operand::distance(
                location_field(distance.center, "Distance.center")?,
                distance.distance,
            ),
        ),
    }
}

// ---------------------------------------------------------------------------
// Expressions and queries
// ---------------------------------------------------------------------------

impl WireFormat for ConstraintExpr {
    type Wire = wire::ConstraintExpr;

    fn to_wire(&self) -> Self::Wire {
        use wire::constraint_expr::{self as ce, Expression};
        let expression = match self {
            Self::And(children) => Expression::And(ce::And {
                expr: children.iter().map(Self::to_wire).collect(),
            }),
            Self::Or(children) => Expression::Or(ce::Or {
                expr: children.iter().map(Self::to_wire).collect(),
            }),
            Self::Not(child) => Expression::Not(Box::new(ce::Not {
                expr: Some(Box::new(child.to_wire())),
            })),
            Self::Constraint(constraint) => Expression::Constraint(ce::Constraint {
                attribute_name: constraint.attribute_name.clone(),
                constraint: Some(constraint_type_to_wire(&constraint.constraint_type)),
            }),
        };
        wire::ConstraintExpr {
            expression: Some(expression),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        use wire::constraint_expr::Expression;
        let expression = wire
            .expression
            .ok_or(SearchError::MissingField("ConstraintExpr.expression"))?;
        let expr = match expression {
            Expression::And(and) => Self::And(decode_children(and.expr)?),
            Expression::Or(or) => Self::Or(decode_children(or.expr)?),
            Expression::Not(not) => {
                let child = not.expr.ok_or(SearchError::MissingField("Not.expr"))?;
                Self::not(Self::from_wire(*child)?)
            }
            Expression::Constraint(constraint) => {
                let constraint_type = constraint
                    .constraint
                    .ok_or(SearchError::MissingField("Constraint.constraint"))?;
                Self::Constraint(Constraint::new(
                    constraint.attribute_name,
                    constraint_type_from_wire(constraint_type)?,
                ))
            }
        };
        expr.check_validity()?;
        Ok(expr)
    }
}

fn decode_children(children: Vec<wire::ConstraintExpr>) -> Result<Vec<ConstraintExpr>, SearchError> {
    children.into_iter().map(ConstraintExpr::from_wire).collect()
}

impl WireFormat for Query {
    type Wire = wire::Model;

    fn to_wire(&self) -> Self::Wire {
        wire::Model {
            constraints: self.constraints().iter().map(ConstraintExpr::to_wire).collect(),
            model: self.model().map(DataModel::to_wire),
        }
    }

    fn from_wire(wire: Self::Wire) -> Result<Self, SearchError> {
        let constraints = decode_children(wire.constraints)?;
        let model = wire.model.map(DataModel::from_wire).transpose()?;
        Self::new(constraints, model)
    }
}
