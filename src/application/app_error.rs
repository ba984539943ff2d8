use thiserror::Error;

use crate::{
    domain::entities::time_window::WindowError,
    use_cases::{active_users::ActiveUserReport, paginator::SweepOutcome},
};

/// Why a single page could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageFetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("page fetch cancelled")]
    Cancelled,
}

impl PageFetchError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PageFetchError::Transport(_) | PageFetchError::HttpStatus { .. }
        )
    }
}

/// A sweep stopped before reaching its last page.
///
/// `partial` holds every record merged before the failing page. When `page` is 1 the
/// failure is fatal and `partial` is empty.
#[derive(Error, Debug)]
#[error("aborted at page {page} of ~{}: {cause}", expected_label(.expected_pages))]
pub struct PaginationError {
    pub page: u32,
    /// Pages the sweep planned to fetch; unknown until the first page succeeds.
    pub expected_pages: Option<u32>,
    #[source]
    pub cause: PageFetchError,
    pub partial: SweepOutcome,
}

impl PaginationError {
    pub fn is_fatal(&self) -> bool {
        self.page == 1
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Window(#[from] WindowError),

    /// The sweep aborted; `partial` is the report computed from what was fetched.
    #[error("aborted at page {page} of ~{}: {cause}", expected_label(.expected_pages))]
    Aborted {
        page: u32,
        expected_pages: Option<u32>,
        #[source]
        cause: PageFetchError,
        partial: Box<ActiveUserReport>,
    },
}

pub type AppResult<T> = Result<T, AppError>;

pub(crate) fn expected_label(expected_pages: &Option<u32>) -> String {
    expected_pages.map_or_else(|| "?".to_string(), |n| n.to_string())
}
