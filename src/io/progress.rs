//! Terminal progress bars for the adjacency build and the annealing run

use crate::algorithm::adjacency::BuildObserver;
use crate::algorithm::annealing::{AnnealingObserver, AnnealingStep};
use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_REFRESH_INTERVAL};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>10}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Owns the bars of one run; every bar is hidden when progress is disabled
pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    /// Manager drawing to the terminal when `enabled`
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    fn bar(&self, prefix: &'static str, length: usize) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(length as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(prefix);
        self.multi_progress.add(bar)
    }

    /// Bar for an adjacency build over `tile_count` tiles
    pub fn build_bar(&self, tile_count: usize) -> BuildProgress {
        BuildProgress {
            bar: self.bar("adjacency", tile_count * 4),
        }
    }

    /// Bar for an annealing run of `iterations` steps
    pub fn annealing_bar(&self, iterations: usize) -> AnnealingProgress {
        AnnealingProgress {
            bar: self.bar("annealing", iterations),
        }
    }

    /// Remove all bars from the terminal
    pub fn finish(&self) {
        let _ = self.multi_progress.clear();
    }
}

/// Adjacency build progress, safe to update from worker threads
pub struct BuildProgress {
    bar: ProgressBar,
}

impl BuildProgress {
    /// Mark the bar complete
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl BuildObserver for BuildProgress {
    fn group_finished(&self, completed: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(completed as u64);
    }
}

/// Annealing progress, refreshed every few iterations
pub struct AnnealingProgress {
    bar: ProgressBar,
}

impl AnnealingProgress {
    /// Mark the bar complete
    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl AnnealingObserver for AnnealingProgress {
    fn step(&mut self, step: &AnnealingStep) {
        let done = step.iteration + 1;
        if done.is_multiple_of(PROGRESS_REFRESH_INTERVAL) || Some(done as u64) == self.bar.length() {
            self.bar.set_position(done as u64);
            self.bar
                .set_message(format!("best {:.4} T {:.3e}", step.best_energy, step.temperature));
        }
    }
}
