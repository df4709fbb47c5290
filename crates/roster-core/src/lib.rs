//! # Roster Core
//!
//! Core types, domain entities, and error definitions for Roster.
//! This crate provides the foundational abstractions shared by the
//! configuration and repository layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod list_query;
pub mod result;
pub mod telemetry;
pub mod value;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use list_query::*;
pub use result::*;
pub use value::*;
