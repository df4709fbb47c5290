//! Value objects.

mod provider;
mod role;

pub use provider::AuthProviderType;
pub use role::UserRole;
