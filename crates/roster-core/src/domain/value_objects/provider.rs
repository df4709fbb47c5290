//! Authentication provider value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of provider backing an [`AuthIdentity`](crate::AuthIdentity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderType {
    Email,
    Ldap,
    Saml,
}

impl AuthProviderType {
    /// Returns the value persisted in the `provider_type` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Ldap => "ldap",
            Self::Saml => "saml",
        }
    }

    /// Parses a provider type from its persisted value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "ldap" => Some(Self::Ldap),
            "saml" => Some(Self::Saml),
            _ => None,
        }
    }
}

impl fmt::Display for AuthProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
