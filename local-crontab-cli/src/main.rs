use clap::Parser;
use jiff::tz::TimeZoneDatabase;
use local_crontab::events::rewrite_service;
use local_crontab::{Converter, ShiftPolicy, YearWrapFold};
use serde_json::Value;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::{fs, io, process};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "local-crontab",
    about = "Convert local-time AWS cron expressions to UTC",
    version
)]
struct Cli {
    /// AWS cron expression (e.g., "0 9 ? * MON-FRI *")
    expression: Option<String>,

    /// IANA timezone the expression is written in
    #[arg(short, long)]
    timezone: Option<String>,

    /// Sample UTC offsets in this year instead of the current one
    #[arg(long)]
    year: Option<i16>,

    /// Wrap shifted minutes and hours into range, carrying into the day
    #[arg(long)]
    wrap: bool,

    /// Join December onto January only when their day lists match
    #[arg(long)]
    strict_year_wrap: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Rewrite the schedule events of a JSON service description ("-" for stdin)
    #[arg(long, conflicts_with_all = ["expression", "timezone"])]
    rewrite: Option<PathBuf>,

    /// Directory of zoneinfo files to load timezones from
    #[arg(long, env = "TZDIR")]
    timezone_db: Option<PathBuf>,

    /// Log every conversion
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    // the binary's events share the library's `local_crontab` target prefix
    let default = if verbose { "local_crontab=debug" } else { "local_crontab=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let tzdb = match cli.timezone_db {
        Some(ref dir) => match TimeZoneDatabase::from_dir(dir) {
            Ok(db) => db,
            Err(e) => {
                eprintln!("error: cannot load timezone database {}: {e}", dir.display());
                process::exit(1);
            }
        },
        None => jiff::tz::db().clone(),
    };

    let mut converter = Converter::new(tzdb);
    if let Some(year) = cli.year {
        converter = converter.with_year(year);
    }
    if cli.wrap {
        converter = converter.with_policy(ShiftPolicy::Wrap);
    }
    if cli.strict_year_wrap {
        converter = converter.with_year_wrap(YearWrapFold::MatchingDays);
    }
    debug!(
        year = converter.year(),
        policy = ?converter.policy(),
        year_wrap = ?converter.year_wrap(),
        "converter ready"
    );

    if let Some(ref path) = cli.rewrite {
        let mut service: Value = match read_input(path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("error: invalid JSON in {}: {e}", path.display());
                    process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", path.display());
                process::exit(1);
            }
        };

        if let Err(e) = rewrite_service(&mut service, &converter) {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }

        match serde_json::to_string_pretty(&service) {
            Ok(json) => {
                info!(path = %path.display(), "rewrote service description");
                println!("{json}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("error: failed to serialize: {e}");
                process::exit(1);
            }
        }
    }

    let expression = match cli.expression {
        Some(ref expr) => expr.as_str(),
        None => {
            eprintln!("error: no expression provided");
            process::exit(2);
        }
    };

    let timezone = match cli.timezone {
        Some(ref tz) => tz.as_str(),
        None => {
            eprintln!("error: no timezone provided (use --timezone)");
            process::exit(2);
        }
    };

    let results = match converter.convert(expression, timezone) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string(&results) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize: {e}");
                process::exit(1);
            }
        }
    } else {
        for expr in &results {
            println!("{expr}");
        }
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
