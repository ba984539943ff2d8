use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use active_users::{
    adapters::{
        console::{render_aborted, render_report},
        snapshot::{load_records, save_records},
    },
    app_error::AppError,
    infra::{
        cli::Cli,
        config::AppConfig,
        setup::{init_tracing, init_use_cases},
    },
    use_cases::{active_users::ActiveUserReport, paginator::SweepOutcome},
};

/// Exit status when the sweep aborted and only partial counts were printed.
const EXIT_ABORTED: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing()?;

    let config = AppConfig::from_cli(&cli)?;
    let now = cli.as_of.unwrap_or_else(Utc::now);

    if let Some(path) = &cli.load_records {
        let records = load_records(path).await?;
        info!(path = %path.display(), records = records.len(), "loaded saved records");
        let report =
            ActiveUserReport::from_sweep(config.window, SweepOutcome::from_records(records), now)?;
        print!("{}", render_report(&report));
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let use_cases = init_use_cases(&config, cancel)?;
    info!(
        window = %config.window,
        page_size = config.sweep.page_size,
        "counting active users"
    );

    match use_cases.count_active_users(now).await {
        Ok(report) => {
            if let Some(path) = &cli.save_records {
                save_records(path, &report.sweep.records).await?;
                info!(path = %path.display(), "records saved");
            }
            print!("{}", render_report(&report));
            Ok(())
        }
        Err(AppError::Aborted {
            page,
            expected_pages,
            cause,
            partial,
        }) => {
            if let Some(path) = &cli.save_records {
                save_records(path, &partial.sweep.records).await?;
                info!(path = %path.display(), "partial records saved");
            }
            print!("{}", render_aborted(page, expected_pages, &cause, &partial));
            std::process::exit(EXIT_ABORTED);
        }
        Err(err) => Err(err.into()),
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping after in-flight requests");
            cancel.cancel();
        }
    });
}
