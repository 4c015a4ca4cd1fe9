//! Boolean composition of constraints.

use std::fmt;

use crate::SearchError;
use crate::constraint::ConstraintType;
use crate::data_model::DataModel;
use crate::description::Description;

/// A constraint on one named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// The attribute the constraint applies to.
    pub attribute_name: String,
    /// The predicate over that attribute's value.
    pub constraint_type: ConstraintType,
}

impl Constraint {
    /// Create a constraint on `attribute_name`.
    pub fn new(attribute_name: impl Into<String>, constraint_type: ConstraintType) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            constraint_type,
        }
    }

    /// Whether `description` satisfies the constraint.
    ///
    /// False when the attribute is absent, or when its value's type differs
    /// from the type the constraint is defined over.
    pub fn check(&self, description: &Description) -> bool {
        let Some(value) = description.value(&self.attribute_name) else {
            return false;
        };
        if let Some(data_type) = self.constraint_type.data_type()
            && value.attribute_type() != data_type
        {
            return false;
        }
        self.constraint_type.check(value)
    }

    /// Whether the constraint's attribute exists in `data_model` with the
    /// type the constraint is defined over.
    pub fn is_valid(&self, data_model: &DataModel) -> bool {
        data_model
            .attribute(&self.attribute_name)
            .is_some_and(|attribute| self.constraint_type.is_valid(attribute))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Constraint(attribute_name={},constraint_type={})",
            self.attribute_name, self.constraint_type
        )
    }
}

/// A boolean expression over constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintExpr {
    /// True when every child is true.
    And(Vec<ConstraintExpr>),
    /// True when any child is true.
    Or(Vec<ConstraintExpr>),
    /// True when the child is false.
    Not(Box<ConstraintExpr>),
    /// A leaf constraint.
    Constraint(Constraint),
}

impl ConstraintExpr {
    /// Wrap `expr` in a negation.
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    /// Whether `description` satisfies the expression.
    pub fn check(&self, description: &Description) -> bool {
        match self {
            Self::And(children) => children.iter().all(|c| c.check(description)),
            Self::Or(children) => children.iter().any(|c| c.check(description)),
            Self::Not(child) => !child.check(description),
            Self::Constraint(constraint) => constraint.check(description),
        }
    }

    /// Whether every leaf constraint is valid against `data_model`.
    pub fn is_valid(&self, data_model: &DataModel) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().all(|c| c.is_valid(data_model))
            }
            Self::Not(child) => child.is_valid(data_model),
            Self::Constraint(constraint) => constraint.is_valid(data_model),
        }
    }

    /// Check the structure: every `And` and `Or` has at least two children.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidExpression`] naming the first
    /// offending node.
    pub fn check_validity(&self) -> Result<(), SearchError> {
        match self {
            Self::And(children) | Self::Or(children) => {
                if children.len() < 2 {
                    return Err(SearchError::InvalidExpression(format!(
                        "{} needs at least 2 subexpressions, got {}",
                        self.operator_name(),
                        children.len()
                    )));
                }
                children.iter().try_for_each(Self::check_validity)
            }
            Self::Not(child) => child.check_validity(),
            Self::Constraint(_) => Ok(()),
        }
    }

    const fn operator_name(&self) -> &'static str {
        match self {
            Self::And(_) => "And",
            Self::Or(_) => "Or",
            Self::Not(_) => "Not",
            Self::Constraint(_) => "Constraint",
        }
    }
}

impl From<Constraint> for ConstraintExpr {
    fn from(constraint: Constraint) -> Self {
        Self::Constraint(constraint)
    }
}

impl fmt::Display for ConstraintExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) | Self::Or(children) => {
                write!(f, "{}([", self.operator_name())?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("])")
            }
            Self::Not(child) => write!(f, "Not({child})"),
            Self::Constraint(constraint) => write!(f, "{constraint}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, AttributeType, AttributeValue};
    use crate::constraint::Operand;

    fn c(name: &str, kind: &str, operand: Operand) -> ConstraintExpr {
        Constraint::new(name, ConstraintType::parse(kind, operand).unwrap()).into()
    }

    fn book(author: &str, year: i64, genre: &str) -> Description {
        Description::from_values(
            "book",
            [
                ("author", AttributeValue::from(author)),
                ("year", AttributeValue::Int(year)),
                ("genre", AttributeValue::from(genre)),
            ],
        )
    }

    #[test]
    fn leaf_checks() {
        let year = c("year", ">", Operand::scalar(2000_i64));
        assert!(year.check(&Description::from_values("", [("year", 2005_i64)])));
        assert!(!year.check(&Description::from_values("", [("year", 1990_i64)])));
        assert!(!year.check(&Description::from_values("", [("author", "King")])));
        // Wrong runtime type.
        assert!(!year.check(&Description::from_values("", [("year", "2005")])));
    }

    #[test]
    fn set_leaf_type_gate_uses_first_member() {
        let genre = c("genre", "in", Operand::set(["horror", "science_fiction"]));
        assert!(!genre.check(&Description::from_values("", [("genre", false)])));
        assert!(genre.check(&book("King", 1991, "horror")));
    }

    #[test]
    fn boolean_composition() {
        let king = c("author", "==", Operand::scalar("Stephen King"));
        let recent = c("year", ">", Operand::scalar(1990_i64));
        let horror = c("genre", "==", Operand::scalar("horror"));

        let and = ConstraintExpr::And(vec![king.clone(), recent.clone()]);
        let or = ConstraintExpr::Or(vec![king.clone(), horror]);
        let not = ConstraintExpr::not(recent);

        let old_king = book("Stephen King", 1975, "horror");
        let orwell = book("George Orwell", 1948, "dystopia");
        assert!(!and.check(&old_king));
        assert!(and.check(&book("Stephen King", 1991, "horror")));
        assert!(or.check(&old_king));
        assert!(!or.check(&orwell));
        assert!(not.check(&orwell));
    }

    #[test]
    fn validity_against_model() {
        let model = DataModel::new(
            "book",
            vec![
                Attribute::new("author", AttributeType::String, true),
                Attribute::new("year", AttributeType::Int, true),
            ],
        )
        .unwrap();
        let good = c("year", "within", Operand::range(1990_i64, 2000_i64));
        let wrong_type = c("year", ">", Operand::scalar("1990"));
        let unknown = c("isbn", "==", Operand::scalar("x"));
        assert!(good.is_valid(&model));
        assert!(!wrong_type.is_valid(&model));
        assert!(!unknown.is_valid(&model));
        assert!(!ConstraintExpr::And(vec![good.clone(), unknown]).is_valid(&model));
        assert!(ConstraintExpr::not(good).is_valid(&model));
    }

    #[test]
    fn structural_validity_requires_two_children() {
        let leaf = c("year", ">", Operand::scalar(1_i64));
        assert!(ConstraintExpr::And(vec![leaf.clone()]).check_validity().is_err());
        assert!(ConstraintExpr::Or(Vec::new()).check_validity().is_err());
        let nested = ConstraintExpr::not(ConstraintExpr::Or(vec![leaf.clone()]));
        assert!(matches!(
            nested.check_validity(),
            Err(SearchError::InvalidExpression(_))
        ));
        assert!(ConstraintExpr::And(vec![leaf.clone(), leaf]).check_validity().is_ok());
    }
}
