use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use env_helpers::get_env_default;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::{
        admin_api::{DEFAULT_RESOURCE_PATH, normalize_base_url},
        progress::DEFAULT_PROGRESS_INTERVAL,
    },
    domain::entities::time_window::{DEFAULT_DAYS, DEFAULT_MONTHS, TimeWindowSpec},
    infra::{cli::Cli, error::InfraError, http_client::DEFAULT_REQUEST_TIMEOUT},
    use_cases::paginator::{DEFAULT_PAGE_SIZE, SweepSettings},
};

pub const DEFAULT_BASE_URL: &str = "https://g.codefresh.io/api";

pub const API_KEY_VAR: &str = "ACTIVE_USERS_API_KEY";
const BASE_URL_VAR: &str = "ACTIVE_USERS_BASE_URL";
const RESOURCE_VAR: &str = "ACTIVE_USERS_RESOURCE";
const BATCH_SIZE_VAR: &str = "ACTIVE_USERS_BATCH_SIZE";
const BATCH_LIMIT_VAR: &str = "ACTIVE_USERS_BATCH_LIMIT";
const MONTHS_VAR: &str = "ACTIVE_USERS_MONTHS";
const DAYS_VAR: &str = "ACTIVE_USERS_DAYS";
const MIDNIGHT_VAR: &str = "ACTIVE_USERS_MIDNIGHT";
const CONCURRENCY_VAR: &str = "ACTIVE_USERS_CONCURRENCY";
const PROGRESS_INTERVAL_VAR: &str = "ACTIVE_USERS_PROGRESS_INTERVAL_SECS";
const REQUEST_TIMEOUT_VAR: &str = "ACTIVE_USERS_REQUEST_TIMEOUT_SECS";

/// Immutable run configuration, resolved from CLI flags, then environment, then defaults.
pub struct AppConfig {
    /// Only required when the API is contacted; loading a snapshot needs no key.
    pub api_key: Option<SecretString>,
    /// Always ends with `/`.
    pub base_url: Url,
    pub resource_path: String,
    pub sweep: SweepSettings,
    pub window: TimeWindowSpec,
    pub progress_interval: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, InfraError> {
        let api_key = cli
            .key
            .clone()
            .or_else(|| std::env::var(API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .map(|key| SecretString::new(key.into()));

        let raw_base_url = cli
            .url
            .clone()
            .unwrap_or_else(|| get_env_default(BASE_URL_VAR, DEFAULT_BASE_URL.to_string()));
        let base_url = Url::parse(&raw_base_url).map_err(|e| InfraError::InvalidConfig {
            var: BASE_URL_VAR,
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(InfraError::InvalidConfig {
                var: BASE_URL_VAR,
                reason: "must start with http:// or https://".into(),
            });
        }

        let resource_path = cli
            .resource
            .clone()
            .unwrap_or_else(|| get_env_default(RESOURCE_VAR, DEFAULT_RESOURCE_PATH.to_string()));

        let page_size: u32 = match cli.batch {
            Some(batch) => batch,
            None => env_var(BATCH_SIZE_VAR)?.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        // Unset means no cap.
        let page_cap: Option<u32> = match cli.limit {
            Some(limit) => Some(limit),
            None => env_var(BATCH_LIMIT_VAR)?,
        };
        let concurrency: u32 = match cli.concurrency {
            Some(concurrency) => concurrency,
            None => env_var(CONCURRENCY_VAR)?.unwrap_or(1),
        };

        let months: u32 = match cli.months {
            Some(months) => months,
            None => env_var(MONTHS_VAR)?.unwrap_or(DEFAULT_MONTHS),
        };
        let days: u32 = match cli.days {
            Some(days) => days,
            None => env_var(DAYS_VAR)?.unwrap_or(DEFAULT_DAYS),
        };
        let truncate_to_midnight = cli.midnight || env_var(MIDNIGHT_VAR)?.unwrap_or(false);

        let progress_interval_secs: u64 = match cli.interval {
            Some(interval) => interval,
            None => env_var(PROGRESS_INTERVAL_VAR)?
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL.as_secs()),
        };
        let request_timeout_secs: u64 = match cli.timeout {
            Some(timeout) => timeout,
            None => env_var(REQUEST_TIMEOUT_VAR)?.unwrap_or(DEFAULT_REQUEST_TIMEOUT.as_secs()),
        };

        let config = Self {
            api_key,
            base_url: normalize_base_url(base_url),
            resource_path,
            sweep: SweepSettings {
                page_size,
                page_cap,
                concurrency: concurrency as usize,
            },
            window: TimeWindowSpec::new(months, days, truncate_to_midnight),
            progress_interval: Duration::from_secs(progress_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), InfraError> {
        let at_least_one = |var: &'static str, value: u64| {
            if value == 0 {
                Err(InfraError::InvalidConfig {
                    var,
                    reason: "must be at least 1".into(),
                })
            } else {
                Ok(())
            }
        };

        at_least_one(BATCH_SIZE_VAR, u64::from(self.sweep.page_size))?;
        if let Some(cap) = self.sweep.page_cap {
            at_least_one(BATCH_LIMIT_VAR, u64::from(cap))?;
        }
        at_least_one(CONCURRENCY_VAR, self.sweep.concurrency as u64)?;
        at_least_one(REQUEST_TIMEOUT_VAR, self.request_timeout.as_secs())?;

        if self.resource_path.trim_matches('/').is_empty() {
            return Err(InfraError::InvalidConfig {
                var: RESOURCE_VAR,
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// The API key, or an error naming where to set it.
    pub fn require_api_key(&self) -> Result<&SecretString, InfraError> {
        self.api_key
            .as_ref()
            .ok_or(InfraError::ApiKeyMissing { var: API_KEY_VAR })
    }
}

/// Read and parse an optional environment variable. Blank counts as unset.
fn env_var<T>(var: &'static str) -> Result<Option<T>, InfraError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_var(var, std::env::var(var).ok().as_deref())
}

fn parse_var<T>(var: &'static str, raw: Option<&str>) -> Result<Option<T>, InfraError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| InfraError::InvalidConfig {
                var,
                reason: format!("{raw:?} is not valid: {e}"),
            }),
    }
}
