mod input;
mod terminal;

use std::fmt;
use std::path::{Path, PathBuf};

use env_logger::Env;
use quiz_core::model::QuizSettings;
use services::{
    Clock, FullscreenSignal, HttpSource, JsonFileSource, ManualSignal, QuestionSource,
    QuizController,
};
use storage::{SnapshotStore, Storage};
use tokio::sync::mpsc;

use crate::input::read_input;
use crate::terminal::TerminalPresenter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeLimit { raw: String },
    EmptyPath { flag: &'static str },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeLimit { raw } => {
                write!(f, "invalid --time-limit value: {raw}")
            }
            ArgsError::EmptyPath { flag } => write!(f, "{flag} cannot be empty"),
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

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyPath { flag });
    }
    Ok(value)
}

fn parse_time_limit(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ArgsError::InvalidTimeLimit { raw }),
    }
}

struct Args {
    questions: String,
    db_url: String,
    time_limit_secs: u32,
    fullscreen: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions =
            std::env::var("QUIZ_QUESTIONS").unwrap_or_else(|_| "questions.json".into());
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut time_limit_secs = match std::env::var("QUIZ_TIME_LIMIT") {
            Ok(raw) => parse_time_limit(raw)?,
            Err(_) => QuizSettings::DEFAULT_TIME_LIMIT_SECS,
        };
        let mut fullscreen = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => questions = require_path(args, "--questions")?,
                "--db" => db_url = normalize_sqlite_url(require_path(args, "--db")?),
                "--time-limit" => {
                    time_limit_secs = parse_time_limit(require_value(args, "--time-limit")?)?;
                }
                "--fullscreen" => fullscreen = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            questions,
            db_url,
            time_limit_secs,
            fullscreen,
        })
    }

    fn source(&self) -> Box<dyn QuestionSource> {
        if self.questions.starts_with("http://") || self.questions.starts_with("https://") {
            Box::new(HttpSource::new(self.questions.clone()))
        } else {
            Box::new(JsonFileSource::new(&self.questions))
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  quiz [--questions <path|url>] [--db <sqlite_url>] [--time-limit <secs>] [--fullscreen]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions questions.json");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --time-limit 600");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_DB_URL, QUIZ_TIME_LIMIT, RUST_LOG");
    eprintln!();
    eprintln!("While running:");
    eprintln!("  <number>  select that option");
    eprintln!("  n         next question");
    eprintln!("  f / x     enter / leave fullscreen");
    eprintln!("  q         quit (progress is kept)");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory so sqlx can open it.
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

    let path = Path::new(path);
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = QuizSettings::default().with_time_limit(args.time_limit_secs)?;
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let snapshots = SnapshotStore::new(storage.kv, settings.storage_key());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut quiz = QuizController::new(
        settings,
        Clock::default(),
        snapshots,
        Box::new(TerminalPresenter::new()),
        tx.clone(),
    );

    let source = args.source();
    log::info!("loading questions from {}", source.describe());
    if !quiz.load(source.as_ref()).await {
        return Err(format!("Error loading questions from {}", source.describe()).into());
    }

    let signal = ManualSignal::new(args.fullscreen, true);
    quiz.on_fullscreen_change(signal.current()).await;

    tokio::spawn(read_input(signal, tx));
    quiz.run(rx).await;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.sqlite3".into()),
            "sqlite:///tmp/quiz.sqlite3"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:/var/quiz.db".into()),
            "sqlite:///var/quiz.db"
        );
        assert!(normalize_sqlite_url("quiz.sqlite3".into()).starts_with("sqlite:///"));
    }

    #[test]
    fn time_limit_must_be_positive() {
        assert_eq!(parse_time_limit(" 90 ".into()).unwrap(), 90);
        assert!(matches!(
            parse_time_limit("0".into()),
            Err(ArgsError::InvalidTimeLimit { .. })
        ));
    }
}
