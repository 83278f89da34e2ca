//! # SalesDash
//!
//! Renders the sales dashboard and keeps it current.
//!
//! This is the main binary crate: it loads configuration, runs render passes
//! through `salesdash-graphs`, re-renders on terminal resize and shows the
//! stat counters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod coordinator;
pub mod counters;
pub mod error;

pub use app::*;
pub use coordinator::*;
pub use counters::*;
pub use error::*;
