//! HTTP client factory with consistent timeout configuration.
//!
//! Clients talking to the admin API should come from `try_build_client()` rather than
//! `reqwest::Client::new()`, so every request is bounded.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
///
/// Pages of a thousand users can take a while to serialize server-side; raise it with
/// `--timeout` for very large page sizes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with the default connect timeout and the given request timeout.
pub fn try_build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .user_agent(concat!("active-users/", env!("CARGO_PKG_VERSION")))
        .build()
}
