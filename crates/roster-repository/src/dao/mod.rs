//! DAO (Data Access Object) layer.
//!
//! DAOs provide low-level, single-source data access abstractions.
//! The repository layer builds [`crate::query`] values and hands them to a
//! DAO, which owns SQL generation and execution.
//!
//! Hierarchy:
//! ```text
//! Service → Repository (interface + impl) → DAO (interface + impl) → DB
//! ```

pub mod r#impl;
pub mod user_dao;

pub use r#impl::MySqlUserDaoImpl;
pub use user_dao::{RoleCountRow, UserDao};
