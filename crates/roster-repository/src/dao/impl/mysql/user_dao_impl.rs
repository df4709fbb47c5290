//! `MySqlUserDaoImpl` — MySQL implementation of [`UserDao`].
//!
//! [`UserDao`]: crate::dao::UserDao

use super::sql;
use crate::dao::{RoleCountRow, UserDao};
use crate::query::{Criteria, FindManyOptions, Relation};
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{
    AuthIdentity, AuthProviderType, RosterError, RosterResult, User, UserField, UserId, UserRole,
};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, MySqlConnection, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// MySQL user DAO.
#[derive(Clone)]
pub struct MySqlUserDaoImpl {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserDaoImpl {
    /// Creates a new MySQL user DAO.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuthIdentityRow {
    user_id: String,
    provider_id: String,
    provider_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AuthIdentityRow> for AuthIdentity {
    type Error = RosterError;

    fn try_from(row: AuthIdentityRow) -> Result<Self, Self::Error> {
        let provider_type = AuthProviderType::parse(&row.provider_type).ok_or_else(|| {
            RosterError::Internal(format!("Invalid provider type in database: {}", row.provider_type))
        })?;

        Ok(AuthIdentity {
            user_id: UserId::new(row.user_id),
            provider_id: row.provider_id,
            provider_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decodes the projected `columns` of `row`; the rest keep their defaults.
fn decode_user(row: &MySqlRow, columns: &[UserField]) -> RosterResult<User> {
    let mut user = User::default();
    for field in columns {
        let column = field.column();
        match field {
            UserField::Id => user.id = UserId::new(row.try_get::<String, _>(column)?),
            UserField::Email => user.email = row.try_get(column)?,
            UserField::FirstName => user.first_name = row.try_get(column)?,
            UserField::LastName => user.last_name = row.try_get(column)?,
            UserField::Password => user.password = row.try_get(column)?,
            UserField::Role => {
                let role: String = row.try_get(column)?;
                user.role = UserRole::parse(&role).ok_or_else(|| {
                    RosterError::Internal(format!("Invalid role in database: {}", role))
                })?;
            }
            UserField::Disabled => user.disabled = row.try_get(column)?,
            UserField::MfaEnabled => user.mfa_enabled = row.try_get(column)?,
            UserField::CreatedAt => user.created_at = row.try_get(column)?,
            UserField::UpdatedAt => user.updated_at = row.try_get(column)?,
            UserField::LastActiveAt => user.last_active_at = row.try_get(column)?,
        }
    }
    Ok(user)
}

async fn fetch_users<'c, E>(executor: E, options: &FindManyOptions) -> RosterResult<Vec<User>>
where
    E: sqlx::Executor<'c, Database = MySql>,
{
    let columns = options.columns();
    let mut query = sql::select_users(options, &columns);
    let rows = query.build().fetch_all(executor).await?;

    rows.iter().map(|row| decode_user(row, &columns)).collect()
}

async fn attach_relations(
    conn: &mut MySqlConnection,
    users: &mut [User],
    options: &FindManyOptions,
) -> RosterResult<()> {
    if users.is_empty() || !options.has_relation(Relation::AuthIdentities) {
        return Ok(());
    }

    let ids: Vec<&UserId> = users.iter().map(|u| &u.id).collect();
    let mut by_user: HashMap<UserId, Vec<AuthIdentity>> = HashMap::new();
    for mut query in sql::select_auth_identities(&ids) {
        let rows = query
            .build_query_as::<AuthIdentityRow>()
            .fetch_all(&mut *conn)
            .await?;
        for row in rows {
            let identity = AuthIdentity::try_from(row)?;
            by_user.entry(identity.user_id.clone()).or_default().push(identity);
        }
    }

    for user in users.iter_mut() {
        user.auth_identities = Some(by_user.remove(&user.id).unwrap_or_default());
    }
    Ok(())
}

async fn find_on(conn: &mut MySqlConnection, options: &FindManyOptions) -> RosterResult<Vec<User>> {
    let mut users = fetch_users(&mut *conn, options).await?;
    attach_relations(conn, &mut users, options).await?;
    Ok(users)
}

#[async_trait]
impl UserDao for MySqlUserDaoImpl {
    async fn find(&self, options: &FindManyOptions) -> RosterResult<Vec<User>> {
        debug!("DAO: find users where {:?}", options.criteria);
        let mut conn = self.pool.inner().acquire().await?;
        find_on(&mut conn, options).await
    }

    async fn find_one(&self, options: &FindManyOptions) -> RosterResult<Option<User>> {
        debug!("DAO: find one user where {:?}", options.criteria);
        let single = FindManyOptions {
            take: Some(1),
            ..options.clone()
        };
        Ok(self.find(&single).await?.into_iter().next())
    }

    async fn find_with(
        &self,
        session: &mut MySqlConnection,
        options: &FindManyOptions,
    ) -> RosterResult<Vec<User>> {
        debug!("DAO: find users in session where {:?}", options.criteria);
        find_on(session, options).await
    }

    async fn delete(&self, criteria: &Criteria) -> RosterResult<u64> {
        debug!("DAO: delete users where {:?}", criteria);
        let mut query = sql::delete_users(criteria)?;
        let result = query.build().execute(self.pool.inner()).await?;
        Ok(result.rows_affected())
    }

    async fn count_grouped_by_role(&self) -> RosterResult<Vec<RoleCountRow>> {
        debug!("DAO: count users grouped by role");
        let rows = sqlx::query_as::<_, RoleCountRow>(sql::COUNT_BY_ROLE)
            .fetch_all(self.pool.inner())
            .await?;
        Ok(rows)
    }
}

impl std::fmt::Debug for MySqlUserDaoImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserDaoImpl").finish_non_exhaustive()
    }
}
