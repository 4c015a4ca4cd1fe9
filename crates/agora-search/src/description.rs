//! Descriptions: attribute values conforming to a data model.

use std::collections::BTreeMap;
use std::fmt;

use crate::SearchError;
use crate::attribute::AttributeValue;
use crate::data_model::{DataModel, generate_data_model};

/// A set of attribute values together with the data model they conform to.
///
/// Construction checks that every required attribute is present, that no
/// value is outside the model, and that every value has its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    values: BTreeMap<String, AttributeValue>,
    data_model: DataModel,
}

impl Description {
    /// Build a description against `data_model`, or against a model
    /// synthesized from the values when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AttributeInconsistency`] if the values do not
    /// conform to the model.
    pub fn new(
        values: BTreeMap<String, AttributeValue>,
        data_model: Option<DataModel>,
    ) -> Result<Self, SearchError> {
        let data_model = data_model.unwrap_or_else(|| generate_data_model("", &values));
        let description = Self { values, data_model };
        description.check_consistency()?;
        Ok(description)
    }

    /// Build a description from `(name, value)` pairs with a synthesized
    /// data model named `model_name`.
    pub fn from_values<I, K, V>(model_name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let values: BTreeMap<String, AttributeValue> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let data_model = generate_data_model(model_name, &values);
        Self { values, data_model }
    }

    fn check_consistency(&self) -> Result<(), SearchError> {
        if let Some(missing) = self
            .data_model
            .attributes()
            .iter()
            .find(|a| a.is_required && !self.values.contains_key(&a.name))
        {
            return Err(SearchError::AttributeInconsistency(format!(
                "missing required attribute {}",
                missing.name
            )));
        }
        for (key, value) in &self.values {
            let Some(attribute) = self.data_model.attribute(key) else {
                return Err(SearchError::AttributeInconsistency(format!(
                    "attribute {key} is not in data model {}",
                    self.data_model.name()
                )));
            };
            if attribute.attribute_type != value.attribute_type() {
                return Err(SearchError::AttributeInconsistency(format!(
                    "attribute {key} has type {}, expected {}",
                    value.attribute_type(),
                    attribute.attribute_type
                )));
            }
        }
        Ok(())
    }

    /// All values by attribute name.
    pub const fn values(&self) -> &BTreeMap<String, AttributeValue> {
        &self.values
    }

    /// The value of one attribute.
    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// The data model this description conforms to.
    pub const fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    /// Attribute names carried by this description, in order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a Description {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Description(values={")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}:{value}")?;
        }
        write!(f, "}},data_model={})", self.data_model)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, AttributeType};

    fn model() -> DataModel {
        DataModel::new(
            "book",
            vec![
                Attribute::new("author", AttributeType::String, true),
                Attribute::new("year", AttributeType::Int, true),
                Attribute::new("genre", AttributeType::String, false),
            ],
        )
        .unwrap()
    }

    fn values(pairs: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn conforming_values_build() {
        let d = Description::new(
            values(&[("author", "King".into()), ("year", 1991_i64.into())]),
            Some(model()),
        )
        .unwrap();
        assert_eq!(d.attribute_names().collect::<Vec<_>>(), vec!["author", "year"]);
        assert_eq!(d.value("year"), Some(&AttributeValue::Int(1991)));
    }

    #[test]
    fn missing_required_attribute_fails() {
        let result = Description::new(values(&[("author", "King".into())]), Some(model()));
        assert!(matches!(result, Err(SearchError::AttributeInconsistency(_))));
    }

    #[test]
    fn extra_attribute_fails() {
        let result = Description::new(
            values(&[
                ("author", "King".into()),
                ("year", 1991_i64.into()),
                ("isbn", "123".into()),
            ]),
            Some(model()),
        );
        assert!(matches!(result, Err(SearchError::AttributeInconsistency(_))));
    }

    #[test]
    fn wrong_type_fails() {
        let result = Description::new(
            values(&[("author", "King".into()), ("year", "1991".into())]),
            Some(model()),
        );
        assert!(matches!(result, Err(SearchError::AttributeInconsistency(_))));
    }

    #[test]
    fn synthesized_model_matches_values() {
        let d = Description::from_values("auto", [("year", 2005_i64)]);
        assert_eq!(d.data_model().name(), "auto");
        let rebuilt = Description::new(d.values().clone(), Some(d.data_model().clone())).unwrap();
        assert_eq!(rebuilt, d);
        assert_eq!((&d).into_iter().count(), 1);
    }
}
