//! `UserRepositoryImpl` — Repository layer implementation.
//!
//! Implements the [`UserRepository`] interface by translating each
//! operation into [`Criteria`] / [`FindManyOptions`] and delegating the
//! single resulting request to a [`UserDao`].
//!
//! ```text
//! Service
//!   ↓ Arc<dyn UserRepository>
//! UserRepositoryImpl          ← builds criteria, shapes list options
//!   ↓ Arc<dyn UserDao>
//! MySqlUserDaoImpl
//!   ↓
//! MySQL
//! ```
//!
//! [`UserRepository`]: crate::traits::UserRepository
//! [`UserDao`]: crate::dao::UserDao

use crate::dao::UserDao;
use crate::query::{Criteria, FindManyOptions, Predicate, Relation};
use crate::traits::UserRepository;
use async_trait::async_trait;
use roster_core::{
    ListQueryOptions, RosterError, RosterResult, User, UserCredentials, UserField, UserId, UserRole,
};
use sqlx::MySqlConnection;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Repository implementation over a single [`UserDao`].
pub struct UserRepositoryImpl {
    user_dao: Arc<dyn UserDao>,
}

impl UserRepositoryImpl {
    /// Creates a new `UserRepositoryImpl` with the given DAO.
    #[must_use]
    pub fn new(user_dao: Arc<dyn UserDao>) -> Self {
        Self { user_dao }
    }
}

fn id_in(ids: &[UserId]) -> Criteria {
    Criteria::new().with(UserField::Id, Predicate::any_of(ids))
}

/// Builds store options from caller list options.
///
/// - No options: only the `authIdentities` relation.
/// - `take` without `select`: the relation is attached for the default view.
/// - `take` with `select`: `id` is forced into the projection, since
///   pagination orders by it.
/// - `filter.isOwner` becomes a `role` constraint; other filter entries pass
///   through unchanged.
///
/// A `take` or `skip` of zero counts as absent.
#[must_use]
pub fn to_find_many_options(options: Option<&ListQueryOptions>) -> FindManyOptions {
    let Some(options) = options else {
        return FindManyOptions::default().with_relation(Relation::AuthIdentities);
    };

    let take = options.take.filter(|&t| t > 0);
    let mut find = FindManyOptions {
        select: options.select.clone(),
        take,
        skip: options.skip.filter(|&s| s > 0),
        ..FindManyOptions::default()
    };

    if take.is_some() {
        match find.select.as_mut() {
            None => find.relations.push(Relation::AuthIdentities),
            Some(select) => {
                select.insert(UserField::Id, true);
            }
        }
    }

    if let Some(filter) = &options.filter {
        find.criteria = filter
            .fields
            .iter()
            .map(|(field, value)| (*field, Predicate::from(value.clone())))
            .collect();

        if let Some(is_owner) = filter.is_owner {
            let owner = Predicate::eq(UserRole::Owner);
            let predicate = if is_owner { owner } else { Predicate::not(owner) };
            find.criteria.insert(UserField::Role, predicate);
        }
    }

    find
}

fn parse_role_counts(rows: Vec<crate::dao::RoleCountRow>) -> RosterResult<BTreeMap<String, u64>> {
    rows.into_iter()
        .map(|row| {
            let count = row.count.trim().parse::<u64>().map_err(|e| {
                RosterError::Database(format!(
                    "Malformed user count {:?} for role {}: {}",
                    row.count, row.role, e
                ))
            })?;
            Ok((row.role, count))
        })
        .collect()
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_many_by_ids(&self, ids: &[UserId]) -> RosterResult<Vec<User>> {
        debug!("Repository: find_many_by_ids ({} ids)", ids.len());
        self.user_dao.find(&FindManyOptions::matching(id_in(ids))).await
    }

    async fn delete_all_except(&self, user: &User) -> RosterResult<u64> {
        debug!("Repository: delete_all_except {}", user.id);
        let criteria = Criteria::new().with(UserField::Id, Predicate::not(Predicate::eq(&user.id)));
        self.user_dao.delete(&criteria).await
    }

    async fn get_by_ids(&self, session: &mut MySqlConnection, ids: &[UserId]) -> RosterResult<Vec<User>> {
        debug!("Repository: get_by_ids ({} ids) in session", ids.len());
        self.user_dao
            .find_with(session, &FindManyOptions::matching(id_in(ids)))
            .await
    }

    async fn find_many_by_email(&self, emails: &[String]) -> RosterResult<Vec<UserCredentials>> {
        debug!("Repository: find_many_by_email ({} emails)", emails.len());
        let options = FindManyOptions::matching(
            Criteria::new().with(UserField::Email, Predicate::any_of(emails)),
        )
        .select([UserField::Email, UserField::Password, UserField::Id]);

        let users = self.user_dao.find(&options).await?;
        Ok(users.into_iter().map(UserCredentials::from).collect())
    }

    async fn delete_many(&self, ids: &[UserId]) -> RosterResult<u64> {
        debug!("Repository: delete_many ({} ids)", ids.len());
        self.user_dao.delete(&id_in(ids)).await
    }

    async fn find_non_shell_user(&self, email: &str) -> RosterResult<Option<User>> {
        debug!("Repository: find_non_shell_user {}", email);
        let options = FindManyOptions::matching(
            Criteria::new()
                .with(UserField::Email, Predicate::eq(email))
                .with(UserField::Password, Predicate::not(Predicate::IsNull)),
        )
        .with_relation(Relation::AuthIdentities);

        self.user_dao.find_one(&options).await
    }

    async fn count_users_by_role(&self) -> RosterResult<BTreeMap<String, u64>> {
        debug!("Repository: count_users_by_role");
        let rows = self.user_dao.count_grouped_by_role().await?;
        parse_role_counts(rows)
    }

    async fn find_many(&self, options: &FindManyOptions) -> RosterResult<Vec<User>> {
        debug!("Repository: find_many where {:?}", options.criteria);
        self.user_dao.find(options).await
    }

    fn to_find_many_options(&self, options: Option<&ListQueryOptions>) -> FindManyOptions {
        to_find_many_options(options)
    }
}

impl std::fmt::Debug for UserRepositoryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepositoryImpl").finish_non_exhaustive()
    }
}
