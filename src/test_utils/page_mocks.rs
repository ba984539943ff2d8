//! In-memory `PageSource` and `ProgressReporter` implementations for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    app_error::PageFetchError,
    application::ports::page_source::{PageRequest, PageSource, ProgressReporter, SweepProgress},
    domain::entities::page::PageResponse,
};

enum Scripted {
    Page(PageResponse),
    Fail(PageFetchError),
    /// Cancel the token, then never answer.
    CancelAndHang(CancellationToken),
}

/// Serves pre-scripted responses and records every request it receives.
///
/// Unscripted pages fail with a transport error so unexpected fetches show up in tests.
#[derive(Default)]
pub struct ScriptedPageSource {
    pages: Mutex<HashMap<u32, Scripted>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, response: PageResponse) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(page, Scripted::Page(response));
        self
    }

    pub fn with_failure(self, page: u32, error: PageFetchError) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(page, Scripted::Fail(error));
        self
    }

    pub fn with_cancel_on(self, page: u32, token: CancellationToken) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(page, Scripted::CancelAndHang(token));
        self
    }

    /// Page numbers requested so far, in request order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.page).collect()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, PageFetchError> {
        self.requests.lock().unwrap().push(request);

        let token = {
            let pages = self.pages.lock().unwrap();
            match pages.get(&request.page) {
                Some(Scripted::Page(response)) => return Ok(response.clone()),
                Some(Scripted::Fail(error)) => return Err(error.clone()),
                Some(Scripted::CancelAndHang(token)) => token.clone(),
                None => {
                    return Err(PageFetchError::Transport(format!(
                        "no scripted response for page {}",
                        request.page
                    )));
                }
            }
        };

        token.cancel();
        std::future::pending().await
    }
}

/// Keeps every progress update for later assertions.
#[derive(Default)]
pub struct RecordingProgress {
    pub updates: Mutex<Vec<SweepProgress>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<SweepProgress> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn on_page(&self, progress: &SweepProgress) {
        self.updates.lock().unwrap().push(*progress);
    }
}
