use aoiscan_analysis::{LayerOutcome, RunObserver};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(bar) = ProgressStyle::default_bar()
        .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(bar.progress_chars("█▓▒░ "));
    }
    pb.set_message(message.to_string());
    pb
}

/// Per-layer progress for an analysis run
pub struct LayerProgress {
    bar: ProgressBar,
}

impl LayerProgress {
    pub fn new(total_layers: usize) -> Self {
        Self { bar: create_progress_bar(total_layers as u64, "Analyzing layers") }
    }

    /// A progress reporter that draws nothing, for JSON output
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunObserver for LayerProgress {
    fn layer_started(&self, _index: usize, url: &str) {
        self.bar.set_message(format!("Querying {}", url));
    }

    fn layer_finished(&self, _index: usize, url: &str, outcome: LayerOutcome<'_>) {
        let line = match outcome {
            LayerOutcome::Succeeded(result) => format!(
                "{} {} ({} features)",
                style("✓").green(),
                result.layer_title(),
                result.feature_count()
            ),
            LayerOutcome::Failed(failure) => {
                format!("{} {}: {}", style("✗").red(), url, failure.message)
            }
        };
        self.bar.println(line);
        self.bar.inc(1);
    }
}
