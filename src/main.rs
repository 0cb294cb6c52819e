mod app;
mod commands;
mod domain;
mod input;
mod notifications;
mod persistence;
mod reminder;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{ClockTime, NewTask, Priority, TaskStatus};
use notifications::{NotificationSink, SilentSink, SoundSink};
use persistence::{
    init_project_dir, load_settings, save_settings, settings_file, tasks_file, DataDir,
    JsonTaskStore, Settings,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timebox")]
#[command(about = "A terminal task tracker that always shows the task whose time window is active now", long_about = None)]
struct Cli {
    /// Don't play warning or alarm sounds, whatever the settings say
    #[arg(long, global = true)]
    no_sound: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .timebox directory in the current directory
    Init,
    /// Add a task with a daily time window
    Add {
        title: String,
        /// Window start (HH:MM)
        #[arg(short, long)]
        start: ClockTime,
        /// Window end (HH:MM)
        #[arg(short, long)]
        end: ClockTime,
        #[arg(short, long, default_value_t = Priority::default())]
        priority: Priority,
        #[arg(long, default_value_t = TaskStatus::default())]
        status: TaskStatus,
    },
    /// List all tasks still within the retention period
    List,
    /// Show the task active right now and its remaining time
    Current,
    /// Mark a task completed (or not, with --no)
    Done {
        /// Task id or a unique prefix of it
        id: String,
        #[arg(long)]
        no: bool,
    },
    /// Move a task's window to start now and last the given minutes
    Snooze {
        /// Task id or a unique prefix of it
        id: String,
        minutes: u32,
    },
    /// Delete a task
    Delete {
        /// Task id or a unique prefix of it
        id: String,
    },
    /// Print completion statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let cwd = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_project_dir(&cwd)?;
        save_settings(settings_file(&data_dir), &Settings::default())?;
        println!("Initialized timebox directory: {}", data_dir.display());
        println!();
        println!("timebox will now use this local directory for task storage.");
        println!("Run 'timebox' to start tracking tasks.");
        return Ok(());
    }

    let located = DataDir::ensure()?;
    let data_dir = located.path().to_path_buf();
    let _guard = init_logging(&data_dir);
    info!(data_dir = ?located, "using data directory");
    let settings = load_settings(settings_file(&data_dir))?;
    let mut store = JsonTaskStore::new(tasks_file(&data_dir), settings.retention());
    let now = Local::now();
    let mut out = io::stdout();

    match cli.command {
        Some(Commands::Init) => Ok(()),
        Some(Commands::Add {
            title,
            start,
            end,
            priority,
            status,
        }) => {
            let fields = NewTask {
                title,
                start_time: start,
                end_time: end,
                priority,
                status,
            };
            commands::add(&mut store, fields, now, &mut out)
        }
        Some(Commands::List) => commands::list(&mut store, now, &mut out),
        Some(Commands::Current) => commands::current(&mut store, now, &mut out),
        Some(Commands::Done { id, no }) => commands::done(&mut store, &id, !no, now, &mut out),
        Some(Commands::Snooze { id, minutes }) => {
            commands::snooze(&mut store, &id, minutes, now, &mut out)
        }
        Some(Commands::Delete { id }) => commands::delete(&mut store, &id, now, &mut out),
        Some(Commands::Stats { json }) => commands::stats(&mut store, now, json, &mut out),
        None => {
            let sink = build_sink(&settings, &data_dir, cli.no_sound);
            run_tui(store, sink, &settings)
        }
    }
}

/// Logs go to `<data dir>/timebox.log`; the terminal belongs to the TUI
fn init_logging(data_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(data_dir, "timebox.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timebox=info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn build_sink(settings: &Settings, data_dir: &Path, no_sound: bool) -> Box<dyn NotificationSink> {
    if no_sound || !settings.sounds_enabled {
        info!("sounds disabled");
        return Box::new(SilentSink);
    }
    Box::new(SoundSink::new(
        settings.sound_dir_in(data_dir),
        settings.sound_player.clone(),
    ))
}

fn run_tui(store: JsonTaskStore, sink: Box<dyn NotificationSink>, settings: &Settings) -> Result<()> {
    let now = Local::now();
    let mut app = AppState::new(Box::new(store), sink, settings.snooze_options.clone(), now)
        .context("Failed to load tasks")?;
    app.tick(now);
    info!("timebox started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, settings.tick_ms);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "timebox stopped with an error");
        eprintln!("Error: {}", err);
    }
    info!("timebox stopped");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    tick_ms: u64,
) -> Result<()> {
    let tick_rate = ticker::tick_duration(tick_ms);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key, Local::now())?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        app.tick(Local::now());
    }
}
