//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod feature_service;

pub use feature_service::FeatureService;
