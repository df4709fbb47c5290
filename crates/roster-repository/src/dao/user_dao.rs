//! UserDao trait — low-level user data access abstraction.
//!
//! Implementations connect directly to a single data source and translate
//! [`FindManyOptions`] / [`Criteria`] into native queries.
//! [`UserRepository`] uses a `UserDao` to fulfil domain-level operations.
//!
//! [`UserRepository`]: crate::traits::UserRepository

use crate::query::{Criteria, FindManyOptions};
use async_trait::async_trait;
use roster_core::{RosterResult, User};
use sqlx::{FromRow, MySqlConnection};

/// One row of the per-role aggregate, as the store returns it.
///
/// `count` is textual; callers decide how to parse it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RoleCountRow {
    pub role: String,
    pub count: String,
}

/// Low-level user data access object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Returns every user matching `options`.
    async fn find(&self, options: &FindManyOptions) -> RosterResult<Vec<User>>;

    /// Returns the first user matching `options`, if any.
    async fn find_one(&self, options: &FindManyOptions) -> RosterResult<Option<User>>;

    /// Like [`find`](Self::find), but runs on a caller-owned connection,
    /// typically one borrowed from an open transaction.
    async fn find_with(
        &self,
        session: &mut MySqlConnection,
        options: &FindManyOptions,
    ) -> RosterResult<Vec<User>>;

    /// Deletes every user matching `criteria`. Returns the rows affected.
    ///
    /// An empty criteria is rejected rather than deleting the whole table.
    async fn delete(&self, criteria: &Criteria) -> RosterResult<u64>;

    /// Groups users by role and counts each group.
    async fn count_grouped_by_role(&self) -> RosterResult<Vec<RoleCountRow>>;
}
