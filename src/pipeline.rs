//! Stage sequencing for one report run: authenticate, resolve the window,
//! fetch, filter, export. The first failing stage aborts the run.

use anyhow::Context as _;
use chrono::Utc;

use crate::auth;
use crate::config::Config;
use crate::export::{self, Report};
use crate::fetch;
use crate::http;
use crate::records::{self, EXCLUDED_CLASSES};
use crate::window::{self, DateRange};

/// Run the full pipeline and return the written report.
///
/// The session client is constructed here and owned for exactly one run.
/// No request leaves before `config` has been validated by the caller, and
/// nothing is written before the fetch has succeeded, so a failed run
/// leaves no partial report behind.
///
/// # Errors
///
/// Returns the first stage error: client construction, login handshake or
/// rejected credentials, empty window, fetch, or export.
pub fn run(config: &Config, range: Option<&DateRange>) -> anyhow::Result<Report> {
    let client = http::build_session_client()?;

    let status = auth::login(
        &client,
        &config.base_url,
        &config.login_path,
        &config.credentials,
    )
    .context("authentication failed")?;
    if !auth::login_accepted(status) {
        return Err(auth::AuthError::RejectedCredentials { status }.into());
    }
    tracing::debug!("login accepted with HTTP {status}");

    let now = Utc::now();
    let window = window::resolve(range, now)?;

    let response = fetch::fetch_stats(&client, &config.base_url, &window)
        .context("stats fetch failed")?;
    let total = response.records.len();
    let kept = records::apply_exclusions(response.records, EXCLUDED_CLASSES);
    tracing::info!("kept {} of {total} records after exclusions", kept.len());

    let today = window::current_report_date(now);
    export::write_report(&kept, range, today, &config.reports_dir)
        .context("report export failed")
}
