//! Progress bar utilities for displaying ingest status

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::utils::config::ProgressConsts;

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }

    /// Percentage bar (total 100) as driven by ingest progress events.
    pub fn percent(desc: &'static str) -> Self {
        Self::new(ProgressConsts::DONE as usize, desc, Animation::Classic)
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = "%"
    )))
}

/// Move the bar to an absolute position (a percentage for ingest bars).
/// Uses try_lock so a contended bar never blocks the event loop; the next event catches up.
pub fn set_bar_position(pb: &ProgressBar, position: usize) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update_to(position);
    }
}

/// Force a refresh of the bar and end its line.
pub fn finish_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.refresh();
        eprintln!();
    }
}

/// Returns a closure that feeds percentage events into the bar, or a no-op when the bar is hidden.
pub fn percent_callback(bar: &Option<ProgressBar>) -> Box<dyn FnMut(u8) + Send> {
    match bar {
        Some(bar) => {
            let bar = Arc::clone(bar);
            Box::new(move |pct: u8| set_bar_position(&bar, pct as usize))
        }
        None => Box::new(|_| {}),
    }
}
