//! User entity.

use crate::{AuthIdentity, UserId, UserRole};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User entity as stored in the `user` table.
///
/// Queries with a projection only populate the projected fields; the rest
/// keep their [`Default`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Email address. Unique when present.
    pub email: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Password hash. `None` marks a shell user without a local credential.
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Global role.
    pub role: UserRole,

    pub disabled: bool,

    pub mfa_enabled: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub last_active_at: Option<NaiveDate>,

    /// Linked external identities. `None` until the relation is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_identities: Option<Vec<AuthIdentity>>,
}

impl User {
    /// Creates a new shell user with the given email and role.
    #[must_use]
    pub fn new(email: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: Some(email.into()),
            role,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Sets the password hash.
    #[must_use]
    pub fn with_password(mut self, password_hash: impl Into<String>) -> Self {
        self.password = Some(password_hash.into());
        self
    }

    /// Checks if the user has no local credential yet.
    #[must_use]
    pub const fn is_shell(&self) -> bool {
        self.password.is_none()
    }

    /// Checks if the user owns the instance.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }
}

/// Credential projection returned by email lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<User> for UserCredentials {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password: user.password,
        }
    }
}

/// Persisted columns of the `user` table.
///
/// Filters and projections are keyed by this type, so only known columns
/// ever reach generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserField {
    Id,
    Email,
    FirstName,
    LastName,
    Password,
    Role,
    Disabled,
    MfaEnabled,
    CreatedAt,
    UpdatedAt,
    LastActiveAt,
}

impl UserField {
    /// Every column, in table order.
    pub const ALL: [Self; 11] = [
        Self::Id,
        Self::Email,
        Self::FirstName,
        Self::LastName,
        Self::Password,
        Self::Role,
        Self::Disabled,
        Self::MfaEnabled,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::LastActiveAt,
    ];

    /// Returns the SQL column name.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Password => "password",
            Self::Role => "role",
            Self::Disabled => "disabled",
            Self::MfaEnabled => "mfa_enabled",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::LastActiveAt => "last_active_at",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
