mod calc;
mod cmd;
mod data;
mod ui;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daycal", about = "month calendar with per-day events")]
struct Cli {
    /// Path to the data directory containing config and event files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config and an empty events file
    Init,
    /// Print a greeting and the next upcoming events
    Upcoming {
        /// How many events to show (default: `upcoming_limit` from config.yaml)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print one day's events in time order
    Timeline {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },
    /// Add an event without opening the calendar
    Add {
        /// Day of the event (YYYY-MM-DD)
        date: String,
        title: String,
        /// Start time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
        /// Free-text description
        #[arg(short, long)]
        desc: Option<String>,
    },
    /// Change an event, picked by its number in `timeline` output
    Edit {
        /// Day of the event (YYYY-MM-DD)
        date: String,
        /// Position shown by `timeline` (1-based)
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        desc: Option<String>,
    },
    /// Delete an event, picked by its number in `timeline` output
    Delete {
        /// Day of the event (YYYY-MM-DD)
        date: String,
        /// Position shown by `timeline` (1-based)
        position: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand. Checked before the log file
    // lands in the directory.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    let needs_init = !is_init_command && dir_needs_init(&data_dir);

    // need guard to live for lifetime of program
    let _guard = setup_logging(&data_dir)?;

    if needs_init {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let result = match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Upcoming { limit }) => cmd::upcoming::run(limit),
        Some(Commands::Timeline { date }) => cmd::timeline::run(&date),
        Some(Commands::Add {
            date,
            title,
            time,
            desc,
        }) => cmd::add::run(&date, &title, time.as_deref(), desc.as_deref()),
        Some(Commands::Edit {
            date,
            position,
            title,
            time,
            desc,
        }) => cmd::edit::run(
            &date,
            position,
            cmd::edit::EditArgs {
                title: title.as_deref(),
                time: time.as_deref(),
                desc: desc.as_deref(),
            },
        ),
        Some(Commands::Delete { date, position }) => cmd::delete::run(&date, position),
    };
    if let Err(e) = &result {
        tracing::error!("{e:#}");
    }
    result
}

/// Daily rolling log file in the data directory. stdout belongs to the
/// terminal UI, so nothing is logged there.
fn setup_logging(data_dir: &Path) -> anyhow::Result<WorkerGuard> {
    use tracing_appender::{
        non_blocking,
        rolling::{RollingFileAppender, Rotation},
    };
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(data_dir)?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, data_dir, "daycal.log");
    let (non_blocking, guard) = non_blocking(file_appender);

    let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daycal=info"));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(env_filter)
        .init();
    Ok(guard)
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
