//! # SalesDash Config
//!
//! Type-safe configuration management for SalesDash.
//!
//! This crate provides configuration loading, validation, and caching with
//! atomic updates, so a resize can swap in a re-read file.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use cache::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
