//! Domain entities.

mod auth_identity;
mod user;

pub use auth_identity::AuthIdentity;
pub use user::{User, UserCredentials, UserField};
