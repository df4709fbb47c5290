//! # Roster Repository
//!
//! Layered data access for the `user` table:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>  (domain interface)
//! UserRepositoryImpl            (builds criteria, shapes list options)
//!   ↓  Arc<dyn UserDao>         (DAO interface)
//! MySqlUserDaoImpl              (DAO impl, MySQL / SQLx)
//!   ↓
//! MySQL
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   traits.rs                    ← UserRepository trait
//!   query.rs                     ← Criteria, Predicate, FindManyOptions
//!   pool.rs                      ← DatabasePool
//!   impl/
//!     user_repository_impl.rs    ← UserRepositoryImpl
//!   dao/
//!     user_dao.rs                ← UserDao trait
//!     impl/mysql/
//!       sql.rs                   ← query rendering
//!       user_dao_impl.rs         ← MySqlUserDaoImpl
//! ```

pub mod dao;
pub mod pool;
pub mod query;
pub mod traits;
pub mod r#impl;

pub use dao::{MySqlUserDaoImpl, RoleCountRow, UserDao};
pub use pool::*;
pub use query::{Criteria, FindManyOptions, Predicate, Relation};
pub use r#impl::{to_find_many_options, UserRepositoryImpl};
pub use traits::*;
