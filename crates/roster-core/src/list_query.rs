//! Listing request descriptor produced by callers of the user listing.

use crate::{UserField, UserRole, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field projection keyed by column; `true` marks a projected column.
pub type Select = BTreeMap<UserField, bool>;

/// Options for listing users.
///
/// Deserializes from the camelCase JSON shape callers send, e.g.
/// `{"filter": {"isOwner": true}, "select": {"email": true}, "take": 10}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ListQueryFilter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Select>,

    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,

    /// Offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
}

impl ListQueryOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: ListQueryFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Projects the given fields.
    #[must_use]
    pub fn with_select(mut self, fields: impl IntoIterator<Item = UserField>) -> Self {
        self.select = Some(fields.into_iter().map(|f| (f, true)).collect());
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    /// Sets the offset.
    #[must_use]
    pub const fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }
}

/// Filter part of [`ListQueryOptions`].
///
/// `is_owner` is a logical flag with no backing column; every other key is a
/// column constraint passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,

    #[serde(flatten)]
    pub fields: BTreeMap<UserField, FilterValue>,
}

impl ListQueryFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to owners (`true`) or non-owners (`false`).
    #[must_use]
    pub const fn with_is_owner(mut self, is_owner: bool) -> Self {
        self.is_owner = Some(is_owner);
        self
    }

    /// Adds a column constraint.
    #[must_use]
    pub fn with_field(mut self, field: UserField, value: impl Into<FilterValue>) -> Self {
        self.fields.insert(field, value.into());
        self
    }
}

/// Constraint on a single column: `null`, a scalar, or a list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    One(Value),
    Many(Vec<Value>),
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::One(Value::from(s))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::One(Value::Bool(b))
    }
}

impl From<UserRole> for FilterValue {
    fn from(role: UserRole) -> Self {
        Self::One(Value::from(role))
    }
}

impl From<Vec<Value>> for FilterValue {
    fn from(values: Vec<Value>) -> Self {
        Self::Many(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_options() {
        let options: ListQueryOptions = serde_json::from_value(json!({
            "filter": { "isOwner": false, "firstName": "Ada", "lastName": null },
            "select": { "email": true, "firstName": true },
            "take": 10,
            "skip": 20
        }))
        .unwrap();

        let filter = options.filter.as_ref().unwrap();
        assert_eq!(filter.is_owner, Some(false));
        assert_eq!(
            filter.fields.get(&UserField::FirstName),
            Some(&FilterValue::One(Value::from("Ada")))
        );
        assert_eq!(filter.fields.get(&UserField::LastName), Some(&FilterValue::Null));
        assert!(!filter.fields.contains_key(&UserField::Role));

        let select = options.select.as_ref().unwrap();
        assert_eq!(select.get(&UserField::Email), Some(&true));
        assert_eq!(select.len(), 2);
        assert_eq!(options.take, Some(10));
        assert_eq!(options.skip, Some(20));
    }

    #[test]
    fn test_deserialize_list_constraint() {
        let filter: ListQueryFilter =
            serde_json::from_value(json!({ "role": ["admin", "member"] })).unwrap();
        assert_eq!(
            filter.fields.get(&UserField::Role),
            Some(&FilterValue::Many(vec![Value::from("admin"), Value::from("member")]))
        );
        assert_eq!(filter.is_owner, None);
    }

    #[test]
    fn test_deserialize_rejects_unknown_filter_field() {
        let result = serde_json::from_value::<ListQueryOptions>(json!({
            "filter": { "favouriteColour": "red" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_matches_json_shape() {
        let built = ListQueryOptions::new()
            .with_filter(ListQueryFilter::new().with_is_owner(true))
            .with_select([UserField::Email])
            .with_take(10);

        let parsed: ListQueryOptions = serde_json::from_value(json!({
            "filter": { "isOwner": true },
            "select": { "email": true },
            "take": 10
        }))
        .unwrap();

        assert_eq!(built, parsed);
    }
}
