use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    app_error::PageFetchError,
    application::ports::page_source::{PageRequest, PageSource},
    domain::entities::page::PageResponse,
};

pub const DEFAULT_RESOURCE_PATH: &str = "admin/user";

/// A paginated collection on the platform's admin API.
///
/// Requests go to `GET {base_url}{resource_path}?limit={limit}&page={page}` with the raw API
/// key in the `Authorization` header.
#[derive(Clone)]
pub struct AdminApiPageSource {
    client: Client,
    endpoint: Url,
    api_key: SecretString,
}

impl AdminApiPageSource {
    /// `base_url` must already end with `/`; see `normalize_base_url`.
    pub fn new(
        client: Client,
        base_url: &Url,
        resource_path: &str,
        api_key: SecretString,
    ) -> Result<Self, url::ParseError> {
        let endpoint = base_url.join(resource_path.trim_start_matches('/'))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Ensure the base URL's path ends with `/` so relative resource paths append to it.
pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl PageSource for AdminApiPageSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, PageFetchError> {
        debug!(endpoint = %self.endpoint, page = request.page, "requesting page");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("limit", request.limit), ("page", request.page)])
            .header(AUTHORIZATION, self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| PageFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageFetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PageFetchError::Malformed(format!("invalid JSON body: {e}")))?;

        PageResponse::from_json(body).map_err(PageFetchError::Malformed)
    }
}
