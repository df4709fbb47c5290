//! Auth identity entity.

use crate::{AuthProviderType, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An external identity (LDAP, SAML, email) linked to a user.
///
/// Rows live in the `auth_identity` table and are owned by whatever
/// provisions them; the repository layer only reads them as a relation of
/// [`User`](crate::User).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    pub user_id: UserId,
    pub provider_id: String,
    pub provider_type: AuthProviderType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthIdentity {
    /// Creates a new identity linked to `user_id`.
    #[must_use]
    pub fn new(user_id: UserId, provider_id: impl Into<String>, provider_type: AuthProviderType) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            provider_id: provider_id.into(),
            provider_type,
            created_at: now,
            updated_at: now,
        }
    }
}
