use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    app_error::{PageFetchError, PaginationError},
    application::ports::page_source::{
        NoProgress, PageRequest, PageSource, ProgressReporter, SweepProgress,
    },
    domain::entities::{
        page::PageResponse,
        user_record::{UserRecords, upsert},
    },
};

pub const DEFAULT_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSettings {
    pub page_size: u32,
    /// Upper bound on pages fetched, regardless of what the server reports.
    pub page_cap: Option<u32>,
    /// Requests in flight once the page count is known. 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_cap: None,
            concurrency: 1,
        }
    }
}

/// Records gathered by a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOutcome {
    pub records: UserRecords,
    /// `total` from the first page; informational only.
    pub total_reported: u64,
    pub pages_fetched: u32,
    pub expected_pages: u32,
}

impl SweepOutcome {
    /// Outcome for records that did not come from a sweep (e.g. a snapshot file).
    pub fn from_records(records: UserRecords) -> Self {
        Self {
            total_reported: records.len() as u64,
            records,
            pages_fetched: 0,
            expected_pages: 0,
        }
    }
}

/// Walks a paginated collection and merges every page into one identity-keyed map.
pub struct Paginator {
    source: Arc<dyn PageSource>,
    settings: SweepSettings,
    progress: Arc<dyn ProgressReporter>,
    cancel: CancellationToken,
}

impl Paginator {
    pub fn new(source: Arc<dyn PageSource>, settings: SweepSettings) -> Self {
        Self {
            source,
            settings,
            progress: Arc::new(NoProgress),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Cancelling `token` interrupts the in-flight fetch; the sweep then aborts with
    /// everything merged so far as its partial result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Fetch every page (up to the cap) and return the merged records.
    ///
    /// The first page is always fetched on its own: its `pages` field fixes the page
    /// bound for the whole sweep. An empty first page ends the sweep. Empty later pages
    /// do not; only the page bound does.
    #[instrument(skip(self), fields(page_size = self.settings.page_size, page_cap = ?self.settings.page_cap))]
    pub async fn fetch_all(&self) -> Result<SweepOutcome, PaginationError> {
        let mut outcome = SweepOutcome::default();

        let first = match self.fetch(1).await {
            Ok(first) => first,
            Err(cause) => return Err(self.abort(1, None, cause, outcome)),
        };

        let Some(server_pages) = first.pages else {
            let cause = PageFetchError::Malformed("first page is missing `pages`".into());
            return Err(self.abort(1, None, cause, outcome));
        };

        if server_pages == 0 {
            if !first.docs.is_empty() {
                warn!(
                    docs = first.docs.len(),
                    "first page reports zero pages; ignoring its documents"
                );
            }
            outcome.total_reported = first.total.unwrap_or(0);
            outcome.pages_fetched = 1;
            outcome.expected_pages = 1;
            return Ok(outcome);
        }

        let bound = match self.settings.page_cap {
            Some(cap) => server_pages.min(cap),
            None => server_pages,
        };
        if bound < server_pages {
            info!(
                server_pages,
                page_cap = bound,
                "page cap is below the server total; result will be partial"
            );
        }

        outcome.total_reported = first.total.unwrap_or(0);
        outcome.expected_pages = bound.max(1);
        self.merge(&mut outcome, 1, &first);

        if first.docs.is_empty() {
            if server_pages > 1 {
                warn!(server_pages, "first page is empty; ending sweep");
            }
            outcome.expected_pages = 1;
            return Ok(outcome);
        }

        let mut remaining = stream::iter(2..=bound)
            .map(|page| async move { (page, self.fetch(page).await) })
            .buffered(self.settings.concurrency.max(1));

        while let Some((page, result)) = remaining.next().await {
            match result {
                Ok(response) => self.merge(&mut outcome, page, &response),
                Err(cause) => return Err(self.abort(page, Some(bound), cause, outcome)),
            }
        }

        info!(
            users = outcome.records.len(),
            pages = outcome.pages_fetched,
            "sweep complete"
        );
        Ok(outcome)
    }

    async fn fetch(&self, page: u32) -> Result<PageResponse, PageFetchError> {
        if self.cancel.is_cancelled() {
            return Err(PageFetchError::Cancelled);
        }

        let request = PageRequest {
            page,
            limit: self.settings.page_size,
        };
        debug!(page, limit = request.limit, "fetching page");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PageFetchError::Cancelled),
            result = self.source.fetch_page(request) => result,
        }
    }

    fn merge(&self, outcome: &mut SweepOutcome, page: u32, response: &PageResponse) {
        let mut merged = 0usize;
        for record in response.records() {
            upsert(&mut outcome.records, record);
            merged += 1;
        }

        let dropped = response.docs.len() - merged;
        if dropped > 0 {
            debug!(page, dropped, "skipped documents without an identity");
        }

        outcome.pages_fetched += 1;
        self.progress.on_page(&SweepProgress {
            page,
            expected_pages: outcome.expected_pages,
            discovered: outcome.records.len(),
            total_reported: outcome.total_reported,
        });
    }

    fn abort(
        &self,
        page: u32,
        expected_pages: Option<u32>,
        cause: PageFetchError,
        partial: SweepOutcome,
    ) -> PaginationError {
        warn!(
            page,
            expected_pages = ?expected_pages,
            merged = partial.records.len(),
            error = %cause,
            "sweep aborted"
        );
        PaginationError {
            page,
            expected_pages,
            cause,
            partial,
        }
    }
}
