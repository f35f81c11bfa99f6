use clap::Parser;

use errmon::config::Config;
use errmon::output;
use errmon::pipeline;
use errmon::window::DateRange;

#[derive(Parser)]
#[command(
    name = "errmon",
    version,
    about = "Export filtered error-monitoring stats as a dated CSV report"
)]
struct Cli {
    /// Range start date (YYYY-MM-DD); needs END_DATE too
    start_date: Option<String>,

    /// Range end date (YYYY-MM-DD)
    end_date: Option<String>,
}

fn main() {
    // .env first so RUST_LOG and the dashboard settings can live there.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let exit_code = or_exit(cmd_generate(&cli));
    std::process::exit(exit_code);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "errmon=warn".into()),
        )
        // Diagnostics go to stderr; stdout is reserved for the result line.
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_generate(cli: &Cli) -> anyhow::Result<i32> {
    let range = parse_range(cli.start_date.as_deref(), cli.end_date.as_deref())?;
    let config = Config::from_env()?;
    let report = pipeline::run(&config, range.as_ref())?;

    eprintln!("[errmon] exported to {}", report.full_path.display());
    output::print_json_line(&report)?;
    Ok(0)
}

/// Both dates or neither; a lone date is ambiguous and refused.
fn parse_range(start: Option<&str>, end: Option<&str>) -> anyhow::Result<Option<DateRange>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some(DateRange {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })),
        _ => anyhow::bail!("START_DATE and END_DATE must be given together"),
    }
}

fn parse_date(value: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date {value:?} (expected YYYY-MM-DD): {e}"))
}

fn or_exit(r: anyhow::Result<i32>) -> i32 {
    r.unwrap_or_else(|e| {
        eprintln!("[errmon] error: {e:#}");
        1
    })
}
