use blackjack_rs::tui::{app::AppState, controller};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Stdout};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// Logs go to a file only; the TUI owns the terminal.
fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("BLACKJACK_LOG") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn seed_from_env() -> Option<u64> {
    let raw = std::env::var("BLACKJACK_SEED").ok()?;
    match raw.trim().parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(err) => {
            tracing::warn!(%raw, %err, "ignoring invalid BLACKJACK_SEED");
            None
        }
    }
}

fn main() -> io::Result<()> {
    if !io::stdout().is_terminal() {
        println!(
            "blackjack-rs TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            blackjack_rs::VERSION
        );
        return Ok(());
    }
    init_logging()?;
    let seed = seed_from_env();
    tracing::info!(version = blackjack_rs::VERSION, seed = ?seed, "starting");

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(100);
    let mut app = AppState::new(seed);

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    let stats = app.engine.statistics();
    tracing::info!(
        wins = stats.wins(),
        losses = stats.losses(),
        ties = stats.ties(),
        "session ended"
    );
    res
}
