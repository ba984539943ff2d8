use crate::{
    adapters::{admin_api::AdminApiPageSource, progress::LogProgress},
    infra::{config::AppConfig, error::InfraError, http_client::try_build_client},
    use_cases::{active_users::ActiveUsersUseCases, paginator::Paginator},
};
use std::fs::File;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_VAR: &str = "LOG_FILE";

/// Wire the admin API source, the paginator and the use cases from configuration.
pub fn init_use_cases(
    config: &AppConfig,
    cancel: CancellationToken,
) -> Result<ActiveUsersUseCases, InfraError> {
    let api_key = config.require_api_key()?.clone();
    let client = try_build_client(config.request_timeout)?;

    let source = AdminApiPageSource::new(client, &config.base_url, &config.resource_path, api_key)
        .map_err(|e| InfraError::InvalidConfig {
            var: "ACTIVE_USERS_RESOURCE",
            reason: e.to_string(),
        })?;

    let paginator = Paginator::new(Arc::new(source), config.sweep)
        .with_progress(Arc::new(LogProgress::new(config.progress_interval)))
        .with_cancellation(cancel);

    Ok(ActiveUsersUseCases::new(paginator, config.window))
}

/// Console logs go to stderr so stdout carries only the report. Set `LOG_FILE` to also
/// write structured JSON logs.
pub fn init_tracing() -> Result<(), InfraError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "active_users=info".into());

    // Console (human-readable logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true)
        .with_writer(std::io::stderr);

    // File (structured JSON logs)
    let json_layer = match std::env::var(LOG_FILE_VAR) {
        Ok(path) if !path.is_empty() => {
            let file = File::create(&path).map_err(|source| InfraError::LogFile {
                path: path.clone(),
                source,
            })?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
