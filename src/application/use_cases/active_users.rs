use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult, PaginationError},
    domain::entities::time_window::{TimeWindowSpec, WindowError},
    use_cases::{
        classifier::{Classification, classify},
        paginator::{Paginator, SweepOutcome},
    },
};

/// Everything the driver needs to render a run.
#[derive(Debug, Clone)]
pub struct ActiveUserReport {
    pub window: TimeWindowSpec,
    pub classification: Classification,
    pub sweep: SweepOutcome,
}

impl ActiveUserReport {
    pub fn from_sweep(
        window: TimeWindowSpec,
        sweep: SweepOutcome,
        now: DateTime<Utc>,
    ) -> Result<Self, WindowError> {
        let classification = classify(&sweep.records, &window, now)?;
        Ok(Self {
            window,
            classification,
            sweep,
        })
    }

    pub fn window_description(&self) -> String {
        self.window.describe()
    }

    pub fn active_count(&self) -> usize {
        self.classification.active_count()
    }

    pub fn timeless_count(&self) -> usize {
        self.classification.timeless_count()
    }

    pub fn inactive_count(&self) -> usize {
        self.classification.inactive_count()
    }

    pub fn total_records(&self) -> usize {
        self.classification.total
    }
}

pub struct ActiveUsersUseCases {
    paginator: Paginator,
    window: TimeWindowSpec,
}

impl ActiveUsersUseCases {
    pub fn new(paginator: Paginator, window: TimeWindowSpec) -> Self {
        Self { paginator, window }
    }

    pub fn window(&self) -> &TimeWindowSpec {
        &self.window
    }

    /// Sweep the user collection, then classify what was found.
    ///
    /// A sweep that aborts still gets classified; the partial report travels inside
    /// `AppError::Aborted` so the caller can decide whether to use it.
    #[instrument(skip(self), fields(window = %self.window))]
    pub async fn count_active_users(&self, now: DateTime<Utc>) -> AppResult<ActiveUserReport> {
        // Fail before any request if the cutoff cannot be computed.
        self.window.cutoff_from(now)?;

        match self.paginator.fetch_all().await {
            Ok(sweep) => {
                let report = ActiveUserReport::from_sweep(self.window, sweep, now)?;
                info!(
                    active = report.active_count(),
                    timeless = report.timeless_count(),
                    total = report.total_records(),
                    "active users counted"
                );
                Ok(report)
            }
            Err(PaginationError {
                page,
                expected_pages,
                cause,
                partial,
            }) => {
                let partial = ActiveUserReport::from_sweep(self.window, partial, now)?;
                Err(AppError::Aborted {
                    page,
                    expected_pages,
                    cause,
                    partial: Box::new(partial),
                })
            }
        }
    }
}
