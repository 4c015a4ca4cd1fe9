//! Queries: a conjunction of constraint expressions.

use std::fmt;

use tracing::warn;

use crate::SearchError;
use crate::data_model::DataModel;
use crate::description::Description;
use crate::expression::ConstraintExpr;

/// A conjunction of constraint expressions, optionally bound to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    constraints: Vec<ConstraintExpr>,
    model: Option<DataModel>,
}

impl Query {
    /// Build a query.
    ///
    /// An empty constraint list is accepted but deprecated and logs a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] if a model is given and some
    /// constraint is not valid against it.
    pub fn new(constraints: Vec<ConstraintExpr>, model: Option<DataModel>) -> Result<Self, SearchError> {
        let query = Self { constraints, model };
        if query.constraints.is_empty() {
            warn!("deprecated: query built with an empty list of constraints, at least 1 is expected");
        }
        if let Some(model) = &query.model
            && !query.is_valid(Some(model))
        {
            return Err(SearchError::InvalidQuery {
                model: model.name().to_owned(),
            });
        }
        Ok(query)
    }

    /// The constraint expressions.
    pub fn constraints(&self) -> &[ConstraintExpr] {
        &self.constraints
    }

    /// The data model, if any.
    pub const fn model(&self) -> Option<&DataModel> {
        self.model.as_ref()
    }

    /// Whether `description` satisfies every constraint.
    pub fn check(&self, description: &Description) -> bool {
        self.constraints.iter().all(|c| c.check(description))
    }

    /// Whether every constraint is valid against `data_model`. Always true
    /// without a model.
    pub fn is_valid(&self, data_model: Option<&DataModel>) -> bool {
        data_model.is_none_or(|model| self.constraints.iter().all(|c| c.is_valid(model)))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Query(constraints=[")?;
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{constraint}")?;
        }
        match &self.model {
            Some(model) => write!(f, "],model={model})"),
            None => f.write_str("],model=None)"),
        }
    }
}
