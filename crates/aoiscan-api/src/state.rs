use aoiscan_analysis::{AnalysisRunner, RunOptions};
use aoiscan_core::config::LayeredConfig;
use aoiscan_core::error::Result;
use aoiscan_core::models::{AnalysisResult, Viewport};
use aoiscan_core::ports::FeatureService;
use aoiscan_service::remote_service;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Feature service shared by every request
pub type SharedService = Arc<dyn FeatureService>;

/// Shared server state
///
/// Holds the latest run's results. Only one run may be in flight; the result
/// list is swapped in whole when a run finishes.
pub struct AppState {
    pub runner: AnalysisRunner<SharedService>,
    pub viewport: Viewport,
    results: RwLock<Arc<Vec<AnalysisResult>>>,
    running: AtomicBool,
}

impl AppState {
    pub fn new(service: SharedService, options: RunOptions, viewport: Viewport) -> Self {
        Self {
            runner: AnalysisRunner::with_options(service, options),
            viewport,
            results: RwLock::new(Arc::new(Vec::new())),
            running: AtomicBool::new(false),
        }
    }

    /// State over remote feature services only
    ///
    /// Layer URLs arrive in request bodies, so files on the server are never
    /// read as layers.
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let service: SharedService = Arc::new(remote_service(config)?);
        Ok(Self::new(service, RunOptions::from_config(config), config.viewport.value))
    }

    /// Results of the last completed run
    pub fn results(&self) -> Arc<Vec<AnalysisResult>> {
        self.results.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn replace_results(&self, results: Vec<AnalysisResult>) {
        *self.results.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(results);
    }

    /// Claim the run slot; `None` while another run holds it
    pub fn try_begin_run(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard { running: &self.running })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the run slot when dropped
pub struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
