use thiserror::Error;

/// Infrastructure errors that can occur during startup.
///
/// SECURITY: Display messages never include the API key. Keep it that way when adding
/// variants; the key is only ever held as a `SecretString`.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: API key not set (pass --key or set {var})")]
    ApiKeyMissing { var: &'static str },

    #[error("Configuration error: {var} is invalid: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    #[error("HTTP client initialization failed")]
    HttpClient(#[source] reqwest::Error),

    #[error("Cannot open log file {path}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for InfraError {
    fn from(e: reqwest::Error) -> Self {
        InfraError::HttpClient(e)
    }
}
