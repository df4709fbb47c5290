//! SQL rendering for the MySQL user DAO.
//!
//! Column names come from [`UserField::column`] only; every value is bound.

use crate::query::{Criteria, FindManyOptions, Predicate};
use roster_core::{RosterError, RosterResult, UserField, UserId, Value};
use sqlx::{MySql, QueryBuilder};

pub(super) const COUNT_BY_ROLE: &str =
    "SELECT `role`, CAST(COUNT(`role`) AS CHAR) AS `count` FROM `user` GROUP BY `role`";

pub(super) fn select_users(options: &FindManyOptions, columns: &[UserField]) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new("SELECT ");
    for (i, field) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(format!("`{}`", field.column()));
    }
    qb.push(" FROM `user`");
    push_where(&mut qb, &options.criteria);

    if options.is_paginated() {
        qb.push(" ORDER BY `id` ASC LIMIT ");
        // MySQL has no OFFSET without LIMIT; u64::MAX is its documented "no limit".
        qb.push_bind(options.take.unwrap_or(u64::MAX));
        if let Some(skip) = options.skip {
            qb.push(" OFFSET ");
            qb.push_bind(skip);
        }
    }
    qb
}

pub(super) fn delete_users(criteria: &Criteria) -> RosterResult<QueryBuilder<'static, MySql>> {
    if criteria.is_empty() {
        return Err(RosterError::validation("refusing to delete users without criteria"));
    }
    let mut qb = QueryBuilder::new("DELETE FROM `user`");
    push_where(&mut qb, criteria);
    Ok(qb)
}

/// Most user ids bound into one relation lookup. MySQL rejects prepared
/// statements with more than 65,535 placeholders.
pub(super) const LOOKUP_BATCH_SIZE: usize = 1_000;

/// Relation lookups for `user_ids`, one statement per batch.
pub(super) fn select_auth_identities(user_ids: &[&UserId]) -> Vec<QueryBuilder<'static, MySql>> {
    user_ids
        .chunks(LOOKUP_BATCH_SIZE)
        .map(select_auth_identities_batch)
        .collect()
}

fn select_auth_identities_batch(user_ids: &[&UserId]) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(
        "SELECT `user_id`, `provider_id`, `provider_type`, `created_at`, `updated_at` \
         FROM `auth_identity` WHERE `user_id` IN (",
    );
    for (i, id) in user_ids.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push_bind(id.as_str().to_string());
    }
    qb.push(") ORDER BY `created_at` ASC");
    qb
}

fn push_where(qb: &mut QueryBuilder<'static, MySql>, criteria: &Criteria) {
    if criteria.is_empty() {
        return;
    }
    qb.push(" WHERE ");
    for (i, (field, predicate)) in criteria.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        push_predicate(qb, field.column(), predicate);
    }
}

fn push_predicate(qb: &mut QueryBuilder<'static, MySql>, column: &str, predicate: &Predicate) {
    match predicate {
        Predicate::Equals(value) => {
            qb.push(format!("`{}` = ", column));
            push_value(qb, value);
        }
        Predicate::In(values) if values.is_empty() => {
            qb.push("1 = 0");
        }
        Predicate::In(values) => {
            qb.push(format!("`{}` IN (", column));
            push_values(qb, values);
            qb.push(")");
        }
        Predicate::IsNull => {
            qb.push(format!("`{}` IS NULL", column));
        }
        Predicate::Not(inner) => match inner.as_ref() {
            Predicate::IsNull => {
                qb.push(format!("`{}` IS NOT NULL", column));
            }
            Predicate::Equals(value) => {
                qb.push(format!("`{}` <> ", column));
                push_value(qb, value);
            }
            Predicate::In(values) if !values.is_empty() => {
                qb.push(format!("`{}` NOT IN (", column));
                push_values(qb, values);
                qb.push(")");
            }
            other => {
                qb.push("NOT (");
                push_predicate(qb, column, other);
                qb.push(")");
            }
        },
    }
}

fn push_values(qb: &mut QueryBuilder<'static, MySql>, values: &[Value]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(qb, value);
    }
}

fn push_value(qb: &mut QueryBuilder<'static, MySql>, value: &Value) {
    match value {
        Value::Bool(b) => qb.push_bind(*b),
        Value::Integer(i) => qb.push_bind(*i),
        Value::Text(s) => qb.push_bind(s.clone()),
    };
}
