//! Repository trait definitions.

use crate::query::FindManyOptions;
use async_trait::async_trait;
use roster_core::{ListQueryOptions, RosterResult, User, UserCredentials, UserId};
use sqlx::MySqlConnection;
use std::collections::BTreeMap;

/// Query surface over the `user` table consumed by application services.
///
/// Id and email lists are treated as sets: duplicates and order are
/// irrelevant and an empty list matches nothing. Store failures are
/// returned unchanged.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds every user whose id is in `ids`.
    async fn find_many_by_ids(&self, ids: &[UserId]) -> RosterResult<Vec<User>>;

    /// Deletes every user except `user`. Returns the rows affected.
    async fn delete_all_except(&self, user: &User) -> RosterResult<u64>;

    /// Finds every user whose id is in `ids`, on the caller's session.
    ///
    /// The caller owns the transaction; this never begins, commits or rolls
    /// back.
    async fn get_by_ids(&self, session: &mut MySqlConnection, ids: &[UserId]) -> RosterResult<Vec<User>>;

    /// Finds the credentials of every user whose email is in `emails`.
    async fn find_many_by_email(&self, emails: &[String]) -> RosterResult<Vec<UserCredentials>>;

    /// Deletes every user whose id is in `ids`. Returns the rows affected.
    async fn delete_many(&self, ids: &[UserId]) -> RosterResult<u64>;

    /// Finds the user with `email` that has a password set, with its auth
    /// identities loaded.
    async fn find_non_shell_user(&self, email: &str) -> RosterResult<Option<User>>;

    /// Counts users per role, e.g. `{ admin: 2, member: 6, owner: 1 }`.
    ///
    /// Roles without users are absent.
    async fn count_users_by_role(&self) -> RosterResult<BTreeMap<String, u64>>;

    /// Lists users with options built by [`to_find_many_options`](Self::to_find_many_options).
    async fn find_many(&self, options: &FindManyOptions) -> RosterResult<Vec<User>>;

    /// Shapes caller-supplied list options into store options.
    fn to_find_many_options(&self, options: Option<&ListQueryOptions>) -> FindManyOptions;
}
