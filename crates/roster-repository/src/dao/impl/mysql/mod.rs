//! MySQL DAO implementations.

mod sql;
mod user_dao_impl;

pub use user_dao_impl::MySqlUserDaoImpl;
