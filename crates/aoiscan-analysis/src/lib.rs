//! aoiscan analysis - the multi-layer analysis runner
//!
//! This crate implements the analyze use case: resolve the area of interest,
//! query every layer through a `FeatureService`, and collect per-layer
//! results while isolating per-layer failures.

pub mod models;
pub mod observer;
pub mod runner;

pub use models::{AnalysisRequest, AnalysisRun, LayerOutcome, RunOptions};
pub use observer::{NoopObserver, RunObserver};
pub use runner::AnalysisRunner;
