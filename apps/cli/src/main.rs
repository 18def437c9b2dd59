mod args;
mod config;

use std::io;

use args::Command;
use ledger_app::{AppPaths, AppState, RangeParams, ensure_app_data_dir};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let loaded = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    if loaded.created {
        tracing::info!(file = %loaded.file.display(), "created default config");
    }

    let paths = AppPaths::new(loaded.config.data_dir.clone());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
    tracing::debug!(db = %paths.db_path.display(), "using database");

    let app_state = AppState::new(paths.db_path, loaded.config.range_fallback);
    app_state
        .initialize()
        .map_err(|err| io::Error::other(err.to_string()))?;

    run(&app_state, &loaded.config, args.command).map_err(|err| io::Error::other(err.to_string()))?;
    Ok(())
}

fn run(app: &AppState, config: &config::CliConfig, command: Command) -> ledger_app::Result<()> {
    let services = &app.services;
    match command {
        Command::Cleanup { days } => {
            let deleted = services.usage.cleanup(days.or(config.retention_days))?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        Command::Overall { user } => print_json(&services.usage.overall_usage(&user)?),
        Command::Tracker { user, tracker } => {
            print_json(&services.usage.tracker_usage(&user, &tracker)?)
        }
        Command::Logs {
            user,
            tracker,
            limit,
            offset,
        } => print_json(
            &services
                .usage
                .list_events(&user, tracker.as_deref(), limit, offset)?,
        ),
        Command::Expenses {
            user,
            range,
            start,
            end,
            category,
            tracker,
        } => {
            let params = RangeParams { range, start, end };
            let filter = services.analytics.filter_for(
                &user,
                &params,
                category.as_deref(),
                tracker.as_deref(),
            )?;
            let report = ExpenseReport {
                range: &filter.range,
                summary: services.analytics.summary_stats(&filter)?,
                by_category: services.analytics.expenses_by_category(&filter)?,
            };
            print_json(&report)
        }
        Command::Monthly {
            user,
            year,
            tracker,
        } => print_json(
            &services
                .analytics
                .expenses_by_month(&user, year, tracker.as_deref())?,
        ),
        Command::Settings { retention_days } => {
            services.settings.update(retention_days)?;
            print_json(&services.settings.get()?)
        }
    }
}

#[derive(Serialize)]
struct ExpenseReport<'a> {
    range: &'a ledger_core::TimeRange,
    summary: ledger_core::SummaryStats,
    by_category: Vec<ledger_core::CategoryBreakdown>,
}

fn print_json<T: Serialize>(value: &T) -> ledger_app::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
