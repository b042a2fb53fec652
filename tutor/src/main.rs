//! OmniScience STEM tutor TUI application.
//!
//! A vim-style terminal interface for solving problems, reading lessons and
//! taking quizzes in mathematics, physics and chemistry.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for automated testing:
//!
//! ```bash
//! cargo run -p tutor -- --headless --subject physics
//! ```

mod app;
mod events;
mod headless;
mod ui;

use anyhow::{bail, Context};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tutor_core::{Subject, Tutor, TutorConfig};

use app::{App, PendingRequest};
use events::{drain_queued_input, handle_event, EventResult};
use ui::render::render;

const DEFAULT_LOG_FILTER: &str = "tutor=info,tutor_core=info";

/// Command line options
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    headless: bool,
    help: bool,
    no_persist: bool,
    subject: Option<Subject>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args::default();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--headless" => parsed.headless = true,
            "-h" | "--help" => parsed.help = true,
            "--no-persist" => parsed.no_persist = true,
            "--subject" => {
                let Some(value) = iter.next() else {
                    bail!("--subject needs a value");
                };
                parsed.subject = Some(value.parse::<Subject>()?);
            }
            other => bail!("unknown argument `{other}` (try --help)"),
        }
    }

    Ok(parsed)
}

/// Send logs to stderr in headless mode, to the data directory otherwise.
fn init_logging(config: &TutorConfig, headless: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    );

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return Ok(());
    }

    std::fs::create_dir_all(config.data_dir())
        .with_context(|| format!("creating {}", config.data_dir().display()))?;
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    if args.help {
        print_help();
        return Ok(());
    }

    // Check for API key
    if std::env::var("ANTHROPIC_API_KEY").is_err() {
        eprintln!("Error: ANTHROPIC_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export ANTHROPIC_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let config = TutorConfig::from_env()?;
    init_logging(&config, args.headless)?;

    let tutor = Tutor::from_config(&config, !args.no_persist)?;
    tracing::info!(
        data_dir = %config.data_dir().display(),
        persist = !args.no_persist,
        "tutor ready"
    );

    if args.headless {
        let subject = args.subject.unwrap_or(Subject::Mathematics);
        return headless::run_headless(tutor, subject).await;
    }

    let mut app = App::new();
    if let Some(subject) = args.subject {
        app.open_subject(subject);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app, tutor).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal loop failed");
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut tutor: Tutor,
) -> io::Result<()> {
    let mut pending: Option<PendingRequest> = None;

    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Show the loading state before awaiting the request
        if let Some(request) = pending.take() {
            app.begin_request(&request);
            terminal.draw(|f| render(f, &app))?;
            app.fulfil(&mut tutor, request).await;
            let queued = drain_queued_input(&mut app, || {
                if event::poll(Duration::ZERO)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            })?;
            if queued == EventResult::Quit {
                return Ok(());
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;

            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::Request(request) => pending = Some(request),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("OmniScience - AI-powered STEM tutor");
    println!();
    println!("USAGE:");
    println!("  tutor [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --headless          Run in headless mode (text-only, no TUI)");
    println!("  --subject <NAME>    Start in a subject: mathematics, physics, chemistry");
    println!("  --no-persist        Keep generated lessons in memory only");
    println!();
    println!("ENVIRONMENT:");
    println!("  ANTHROPIC_API_KEY        Required");
    println!("  TUTOR_DATA_DIR           Cache and log directory (default: .omniscience)");
    println!("  TUTOR_REASONING_MODEL    Model used by the solver");
    println!("  TUTOR_FAST_MODEL         Model used for lessons, topics and quizzes");
    println!("  TUTOR_MAX_TOKENS         Response token limit");
    println!("  TUTOR_THINKING_BUDGET    Solver thinking budget, 0 to disable");
    println!("  RUST_LOG                 Log filter (default: {DEFAULT_LOG_FILTER})");
    println!();
    println!("EXAMPLES:");
    println!("  tutor                               # Interactive TUI mode");
    println!("  tutor --subject chemistry           # Open chemistry directly");
    println!("  echo '#topics' | tutor --headless   # Headless, list topics");
}
