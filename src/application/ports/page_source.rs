use async_trait::async_trait;

use crate::{app_error::PageFetchError, domain::entities::page::PageResponse};

/// Which page to fetch and how many records per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

/// A paginated collection of user documents.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, PageFetchError>;
}

/// Snapshot of a sweep after a page has been merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepProgress {
    pub page: u32,
    pub expected_pages: u32,
    pub discovered: usize,
    pub total_reported: u64,
}

impl SweepProgress {
    pub fn is_last_page(&self) -> bool {
        self.page >= self.expected_pages
    }
}

/// Receives progress after every merged page.
pub trait ProgressReporter: Send + Sync {
    fn on_page(&self, progress: &SweepProgress);
}

/// Discards progress.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_page(&self, _progress: &SweepProgress) {}
}
