//! Store-neutral query model.
//!
//! A [`Criteria`] maps each [`UserField`] to one [`Predicate`]; entries are
//! combined with AND. Store implementations translate the model into their
//! native query language.

use chrono::SecondsFormat;
use roster_core::{FilterValue, Select, User, UserField, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Constraint applied to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Equals(Value),
    /// `column IN (values)`; an empty set matches nothing.
    In(Vec<Value>),
    /// `column IS NULL`
    IsNull,
    /// Logical negation of the inner predicate.
    Not(Box<Predicate>),
}

impl Predicate {
    /// `column = value`
    #[must_use]
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::Equals(value.into())
    }

    /// Set membership. Duplicates are dropped; first occurrence wins.
    #[must_use]
    pub fn any_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut set: Vec<Value> = Vec::new();
        for value in values {
            let value = value.into();
            if !set.contains(&value) {
                set.push(value);
            }
        }
        Self::In(set)
    }

    /// Negates `inner`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Evaluates the predicate against a column value with SQL semantics.
    ///
    /// Returns `None` for UNKNOWN (a comparison against NULL).
    #[must_use]
    pub fn evaluate(&self, candidate: Option<&Value>) -> Option<bool> {
        match self {
            Self::Equals(expected) => candidate.map(|c| c == expected),
            Self::In(set) => candidate.map(|c| set.contains(c)),
            Self::IsNull => Some(candidate.is_none()),
            Self::Not(inner) => inner.evaluate(candidate).map(|b| !b),
        }
    }
}

impl From<FilterValue> for Predicate {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Null => Self::IsNull,
            FilterValue::One(v) => Self::Equals(v),
            FilterValue::Many(vs) => Self::any_of(vs),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "= {}", v),
            Self::In(vs) => {
                f.write_str("IN (")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str(")")
            }
            Self::IsNull => f.write_str("IS NULL"),
            Self::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

/// Conjunction of per-column predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    predicates: BTreeMap<UserField, Predicate>,
}

impl Criteria {
    /// Creates an empty criteria that matches every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the predicate for `field`.
    #[must_use]
    pub fn with(mut self, field: UserField, predicate: Predicate) -> Self {
        self.insert(field, predicate);
        self
    }

    /// Sets the predicate for `field`, returning the previous one.
    pub fn insert(&mut self, field: UserField, predicate: Predicate) -> Option<Predicate> {
        self.predicates.insert(field, predicate)
    }

    /// Returns the predicate for `field`.
    #[must_use]
    pub fn get(&self, field: UserField) -> Option<&Predicate> {
        self.predicates.get(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Iterates predicates in column order.
    pub fn iter(&self) -> impl Iterator<Item = (UserField, &Predicate)> {
        self.predicates.iter().map(|(f, p)| (*f, p))
    }

    /// Checks whether `user` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.iter()
            .all(|(field, predicate)| predicate.evaluate(field_value(user, field).as_ref()) == Some(true))
    }
}

impl FromIterator<(UserField, Predicate)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (UserField, Predicate)>>(iter: T) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

/// Reads a column value from an entity, `None` standing for SQL NULL.
#[must_use]
pub fn field_value(user: &User, field: UserField) -> Option<Value> {
    match field {
        UserField::Id => Some(Value::from(&user.id)),
        UserField::Email => user.email.as_ref().map(Value::from),
        UserField::FirstName => user.first_name.as_ref().map(Value::from),
        UserField::LastName => user.last_name.as_ref().map(Value::from),
        UserField::Password => user.password.as_ref().map(Value::from),
        UserField::Role => Some(Value::from(user.role)),
        UserField::Disabled => Some(Value::Bool(user.disabled)),
        UserField::MfaEnabled => Some(Value::Bool(user.mfa_enabled)),
        UserField::CreatedAt => Some(Value::Text(
            user.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        UserField::UpdatedAt => Some(Value::Text(
            user.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        UserField::LastActiveAt => user
            .last_active_at
            .map(|d| Value::Text(d.format("%Y-%m-%d").to_string())),
    }
}

/// Relations that can be loaded alongside users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    AuthIdentities,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthIdentities => f.write_str("authIdentities"),
        }
    }
}

/// Options for a generic "find many" call against the user store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindManyOptions {
    /// Row filter; empty matches every row.
    pub criteria: Criteria,
    /// Column projection; `None` selects every column.
    pub select: Option<Select>,
    /// Relations to attach to each returned user.
    pub relations: Vec<Relation>,
    /// Page size.
    pub take: Option<u64>,
    /// Offset.
    pub skip: Option<u64>,
}

impl FindManyOptions {
    /// Options matching `criteria` with no projection or pagination.
    #[must_use]
    pub fn matching(criteria: Criteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// Restricts the projection to `fields`.
    #[must_use]
    pub fn select(mut self, fields: impl IntoIterator<Item = UserField>) -> Self {
        self.select = Some(fields.into_iter().map(|f| (f, true)).collect());
        self
    }

    /// Attaches `relation` to each returned user.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        self
    }

    #[must_use]
    pub fn has_relation(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    /// Whether a page window applies, which requires a stable row order.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.take.is_some() || self.skip.is_some()
    }

    /// Columns the store must read, in table order.
    ///
    /// Without a projection (or with one that selects nothing) every column
    /// is read. `id` is added whenever a relation has to be joined back.
    #[must_use]
    pub fn columns(&self) -> Vec<UserField> {
        let Some(select) = &self.select else {
            return UserField::ALL.to_vec();
        };

        let mut columns: Vec<UserField> = UserField::ALL
            .into_iter()
            .filter(|f| select.get(f).copied().unwrap_or(false))
            .collect();

        if columns.is_empty() {
            return UserField::ALL.to_vec();
        }
        if !self.relations.is_empty() && !columns.contains(&UserField::Id) {
            columns.insert(0, UserField::Id);
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{UserId, UserRole};

    fn user(id: &str, email: Option<&str>, role: UserRole) -> User {
        User {
            id: UserId::new(id),
            email: email.map(str::to_string),
            role,
            ..User::default()
        }
    }

    #[test]
    fn test_any_of_deduplicates() {
        let p = Predicate::any_of(["a", "b", "a", "c", "b"]);
        assert_eq!(p, Predicate::In(vec!["a".into(), "b".into(), "c".into()]));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let p = Predicate::any_of(Vec::<String>::new());
        assert_eq!(p.evaluate(Some(&Value::from("a"))), Some(false));
        assert_eq!(Predicate::not(p).evaluate(Some(&Value::from("a"))), Some(true));
    }

    #[test]
    fn test_null_semantics() {
        assert_eq!(Predicate::eq("a").evaluate(None), None);
        assert_eq!(Predicate::not(Predicate::eq("a")).evaluate(None), None);
        assert_eq!(Predicate::IsNull.evaluate(None), Some(true));
        assert_eq!(Predicate::not(Predicate::IsNull).evaluate(None), Some(false));
        assert_eq!(
            Predicate::not(Predicate::IsNull).evaluate(Some(&Value::from("x"))),
            Some(true)
        );
    }

    #[test]
    fn test_criteria_is_conjunction() {
        let criteria = Criteria::new()
            .with(UserField::Email, Predicate::eq("a@x.com"))
            .with(UserField::Role, Predicate::not(Predicate::eq(UserRole::Owner)));

        assert!(criteria.matches(&user("1", Some("a@x.com"), UserRole::Admin)));
        assert!(!criteria.matches(&user("2", Some("a@x.com"), UserRole::Owner)));
        assert!(!criteria.matches(&user("3", Some("b@x.com"), UserRole::Admin)));
        assert!(!criteria.matches(&user("4", None, UserRole::Admin)));
        assert!(Criteria::new().matches(&user("5", None, UserRole::Member)));
    }

    #[test]
    fn test_filter_value_conversion() {
        assert_eq!(Predicate::from(FilterValue::Null), Predicate::IsNull);
        assert_eq!(Predicate::from(FilterValue::from("x")), Predicate::eq("x"));
        assert_eq!(
            Predicate::from(FilterValue::Many(vec!["x".into(), "x".into()])),
            Predicate::In(vec!["x".into()])
        );
    }

    #[test]
    fn test_display() {
        let p = Predicate::not(Predicate::any_of(["a", "b"]));
        assert_eq!(p.to_string(), "NOT IN ('a', 'b')");
        assert_eq!(Relation::AuthIdentities.to_string(), "authIdentities");
    }

    #[test]
    fn test_columns_default_to_all() {
        assert_eq!(FindManyOptions::default().columns(), UserField::ALL.to_vec());

        let mut none_selected = FindManyOptions::default();
        none_selected.select = Some([(UserField::Email, false)].into_iter().collect());
        assert_eq!(none_selected.columns(), UserField::ALL.to_vec());
    }

    #[test]
    fn test_columns_follow_table_order() {
        let options =
            FindManyOptions::default().select([UserField::Password, UserField::Email, UserField::Id]);
        assert_eq!(
            options.columns(),
            vec![UserField::Id, UserField::Email, UserField::Password]
        );
    }

    #[test]
    fn test_relations_pull_in_id() {
        let options = FindManyOptions::default()
            .select([UserField::Email])
            .with_relation(Relation::AuthIdentities)
            .with_relation(Relation::AuthIdentities);
        assert_eq!(options.relations.len(), 1);
        assert_eq!(options.columns(), vec![UserField::Id, UserField::Email]);
    }
}
