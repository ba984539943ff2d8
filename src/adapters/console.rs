//! Plain-text rendering of run results for the terminal.

use std::fmt::Write;

use crate::{
    app_error::{PageFetchError, expected_label},
    use_cases::active_users::ActiveUserReport,
};

pub fn render_report(report: &ActiveUserReport) -> String {
    let mut out = format!(
        "Completed with {} active / {} timeless users\n",
        report.active_count(),
        report.timeless_count()
    );
    write_body(&mut out, report);
    out
}

pub fn render_aborted(
    page: u32,
    expected_pages: Option<u32>,
    cause: &PageFetchError,
    partial: &ActiveUserReport,
) -> String {
    let mut out = format!(
        "Aborted after fetching page {page} of ~{} due to {cause}; partial counts follow\n",
        expected_label(&expected_pages)
    );
    write_body(&mut out, partial);
    out
}

fn write_body(out: &mut String, report: &ActiveUserReport) {
    let c = &report.classification;
    let sweep = &report.sweep;

    let _ = writeln!(
        out,
        "Threshold for active users is anyone who has logged in within the last {}",
        report.window_description()
    );
    let _ = writeln!(out, "Cutoff: {}", c.cutoff.to_rfc3339());
    let _ = writeln!(out, "  active:    {}", c.active_count());
    let _ = writeln!(
        out,
        "  timeless:  {} ({} missing, {} unparsable)",
        c.timeless_count(),
        c.missing_login_count(),
        c.unparsable
    );
    let _ = writeln!(out, "  inactive:  {}", c.inactive_count());
    let _ = writeln!(
        out,
        "  examined:  {} of {} reported ({} of {} pages)",
        c.total, sweep.total_reported, sweep.pages_fetched, sweep.expected_pages
    );
}
