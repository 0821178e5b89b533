use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::Catalog;
use services::{
    AnalyticsForwarder, AnalyticsSink, AppServices, Clock, EventBus, NoopSink, QuizFlow,
    TracingSink,
};
use storage::{LocalStore, Storage};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEV_LOG_FILTER: &str =
    "warn,app=debug,ui=debug,services=debug,storage=debug,quiz_core=debug,analytics=debug";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidAnalytics { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAnalytics { raw } => {
                write!(f, "invalid --analytics value: {raw} (expected off or log)")
            }
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

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn new_flow(&self) -> QuizFlow {
        self.services.flow()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnalyticsMode {
    Off,
    Log,
}

impl AnalyticsMode {
    fn parse(raw: &str) -> Result<Self, ArgsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "log" => Ok(Self::Log),
            _ => Err(ArgsError::InvalidAnalytics {
                raw: raw.to_string(),
            }),
        }
    }

    fn sink(self) -> Arc<dyn AnalyticsSink> {
        match self {
            Self::Off => Arc::new(NoopSink),
            Self::Log => Arc::new(TracingSink),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    catalog: Option<PathBuf>,
    analytics: AnalyticsMode,
    dev: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quizdev ui             [--db <sqlite_url>] [--catalog <path>] [--analytics off|log] [--dev]");
    eprintln!("  quizdev check-catalog  [--catalog <path>]");
    eprintln!("  quizdev clear-progress [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --catalog <bundled quizzes>");
    eprintln!("  --analytics off (log with --dev)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CATALOG, QUIZ_ANALYTICS, QUIZ_DEV, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    CheckCatalog,
    ClearProgress,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check-catalog" => Some(Self::CheckCatalog),
            "clear-progress" => Some(Self::ClearProgress),
            _ => None,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("QUIZ_DB_URL")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut catalog = env("QUIZ_CATALOG")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut analytics = env("QUIZ_ANALYTICS")
            .map(|value| AnalyticsMode::parse(&value))
            .transpose()?;
        let mut dev = env("QUIZ_DEV").is_some_and(|value| is_truthy(&value));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => {
                    catalog = Some(PathBuf::from(require_value(args, "--catalog")?));
                }
                "--analytics" => {
                    let value = require_value(args, "--analytics")?;
                    analytics = Some(AnalyticsMode::parse(&value)?);
                }
                "--dev" => dev = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let analytics = analytics.unwrap_or(if dev {
            AnalyticsMode::Log
        } else {
            AnalyticsMode::Off
        });
        Ok(Self {
            db_url,
            catalog,
            analytics,
            dev,
        })
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing(dev: bool) {
    let fallback = if dev { DEV_LOG_FILTER } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (e.g. in tests) is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Catalog::bundled()?);
    };
    let json = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read catalog {}: {err}", path.display()))?;
    Ok(Catalog::from_json(&json)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.dev);
    tracing::debug!(?cmd, db_url = %parsed.db_url, analytics = ?parsed.analytics, "starting");

    let catalog = load_catalog(parsed.catalog.as_ref())?;

    match cmd {
        Command::CheckCatalog => {
            let questions: usize = catalog.iter().map(|quiz| quiz.question_count()).sum();
            println!("catalog ok: {} quizzes, {questions} questions", catalog.len());
            let tags = catalog.owner_tags();
            if !tags.is_empty() {
                println!("assigned to: {}", tags.join(", "));
            }
            Ok(())
        }
        Command::ClearProgress => {
            prepare_sqlite_file(&parsed.db_url)?;
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let store = LocalStore::new(&storage, Clock::system());
            let cleared = store.progress().await.len();
            store.clear_all_progress().await;
            println!("cleared {cleared} progress records");
            Ok(())
        }
        Command::Ui => {
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(&parsed.db_url)?;
            let events =
                EventBus::new().with_listener(Arc::new(AnalyticsForwarder::new(parsed.analytics.sink())));
            let services =
                AppServices::new_sqlite(&parsed.db_url, Clock::system(), catalog, events).await?;

            let mut flow = services.flow();
            let screen = flow.resume().await?;
            tracing::debug!(%screen, "resumed");

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app).with_initial_flow(flow);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("QuizDev")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
