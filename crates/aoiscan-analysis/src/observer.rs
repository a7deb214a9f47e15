//! Progress notifications from a running analysis

use crate::models::LayerOutcome;

/// Receives per-layer progress; every method defaults to doing nothing
pub trait RunObserver: Send + Sync {
    /// A layer is about to be loaded
    fn layer_started(&self, _index: usize, _url: &str) {}

    /// A layer finished, successfully or not
    fn layer_finished(&self, _index: usize, _url: &str, _outcome: LayerOutcome<'_>) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
