//! aoiscan core - widget configuration, domain models, exports and ports
//!
//! This crate holds the domain logic shared by the service adapters, the
//! analysis runner and the presentation layers. It performs no network IO.

pub mod config;
pub mod embed;
pub mod error;
pub mod export;
pub mod models;
pub mod ports;
pub mod widget;

pub use error::{AoiscanError, Result};
