//! aoiscan geo - geometry conversion, spatial predicates and map views
//!
//! This crate evaluates intersects predicates locally with the `geo` crate,
//! validates user supplied regions, and computes the envelope visible in a
//! map view.

pub mod models;
pub mod projection;
pub mod region;
pub mod spatial;
pub mod validation;
