//! Repository layer implementations.
//!
//! The trait lives in `traits.rs`; this module holds the struct that
//! implements it over a [`UserDao`](crate::dao::UserDao).

pub mod user_repository_impl;

pub use user_repository_impl::{to_find_many_options, UserRepositoryImpl};
