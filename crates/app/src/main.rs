use std::fmt;
use std::io::{self, Write};

use quiz_core::model::default_questions;
use services::AppServices;
use tracing_subscriber::EnvFilter;

mod quiz;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  skillquiz [run]  [--db <sqlite_url>]");
    eprintln!("  skillquiz stats  [--db <sqlite_url>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:skillquiz.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Stats,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    command: Command,
    db_url: String,
    json: bool,
}

enum Parsed {
    Args(Args),
    Help,
}

impl Args {
    fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let command = match args.peek().map(String::as_str) {
            None => Command::Run,
            Some(first) if first.starts_with('-') => Command::Run,
            Some(first) => Command::from_arg(first)
                .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?,
        };
        if args.peek().is_some_and(|first| !first.starts_with('-')) {
            args.next();
        }

        let mut db_url = env_db_url.map_or_else(
            || normalize_sqlite_url("sqlite:skillquiz.sqlite3".into()),
            normalize_sqlite_url,
        );
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--json" if command == Command::Stats => json = true,
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Args(Self {
            command,
            db_url,
            json,
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run_quiz(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let answers = quiz::ask_questions(default_questions(), &mut stdin.lock(), &mut stdout)?;
    let report = services
        .rating()
        .present_ratings(&answers, &mut stdout)
        .await?;
    tracing::debug!(
        immediate = %report.run.immediate_score,
        average = %report.average,
        "run recorded"
    );
    Ok(())
}

async fn show_stats(services: &AppServices, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    let totals = services.rating().current_average().await?;

    match (totals, json) {
        (None, false) => writeln!(stdout, "No runs recorded yet.")?,
        (None, true) => writeln!(stdout, "null")?,
        (Some(record), false) => {
            writeln!(stdout, "Questions asked: {}", record.questions_total())?;
            writeln!(stdout, "Positive answers: {}", record.positives_total())?;
            writeln!(stdout, "The average rating is: {}/100", record.average())?;
        }
        (Some(record), true) => {
            let mut value = serde_json::to_value(record)?;
            value["average"] = serde_json::Value::String(record.average().to_string());
            writeln!(stdout, "{value}")?;
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var("QUIZ_DB_URL").ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    let args = match parsed {
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
        Parsed::Args(args) => args,
    };

    // Open + migrate SQLite at startup; the connection lives until shutdown below.
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url).await?;

    let result = match args.command {
        Command::Run => run_quiz(&services).await,
        Command::Stats => show_stats(&services, args.json).await,
    };

    services.shutdown().await;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
