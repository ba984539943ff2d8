use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use crate::application::ports::page_source::{ProgressReporter, SweepProgress};

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Logs "X/Y users discovered" at most once per `interval`, and always on the last page.
pub struct LogProgress {
    interval: Duration,
    last_logged: Mutex<Option<Instant>>,
}

impl LogProgress {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_logged: Mutex::new(None),
        }
    }

    fn due(&self, now: Instant, force: bool) -> bool {
        let Ok(mut last) = self.last_logged.lock() else {
            return force;
        };
        let due = force || last.is_none_or(|at| now.duration_since(at) >= self.interval);
        if due {
            *last = Some(now);
        }
        due
    }
}

impl ProgressReporter for LogProgress {
    fn on_page(&self, progress: &SweepProgress) {
        if !self.due(Instant::now(), progress.is_last_page()) {
            return;
        }
        info!(
            page = progress.page,
            expected_pages = progress.expected_pages,
            "{}/{} users discovered",
            progress.discovered,
            progress.total_reported
        );
    }
}
