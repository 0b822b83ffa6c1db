//! CPU Monitor - real-time terminal dashboard
//!
//! Shows total and per-core CPU usage, a usage history graph, memory and
//! system load. Run with `--help` for options.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use color_eyre::Result;
use cpu_monitor::app::App;
use cpu_monitor::cli::Cli;
use cpu_monitor::config::AppConfig;
use cpu_monitor::event::EventHandler;
use cpu_monitor::metrics::SystemCollector;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(&cli)?;
    init_logging(&config)?;
    config.report_adjustments();
    tracing::info!(?config, "cpu-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    // Build the collector before taking over the screen; it primes the CPU counters.
    let collector = SystemCollector::new();
    let mut app = App::new(&config, Box::new(collector));
    let mut events = EventHandler::new(config.refresh_rate);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal, &mut events).await;
    restore_terminal()?;

    result
}

/// Logs go to `--log-file` when given. The dashboard owns the screen, so
/// otherwise they are discarded.
fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init(),
    }

    Ok(())
}

/// Leave the alternate screen before the panic report is printed.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    restore_on_error(enter_dashboard_screen(), restore_terminal)
}

/// Runs `restore` when `result` is an error, so a half-initialised terminal
/// is handed back in its original mode.
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    if result.is_err() {
        if let Err(err) = restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
    result
}

fn enter_dashboard_screen() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    crossterm::execute!(
        io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use color_eyre::eyre::eyre;

    use super::*;

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: Result<()> = restore_on_error(Err(eyre!("no tty")), || {
            restored.set(true);
            Ok(())
        });
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn successful_setup_keeps_raw_mode() {
        let restored = Cell::new(false);
        let result = restore_on_error(Ok(7), || {
            restored.set(true);
            Ok(())
        });
        assert_eq!(result.ok(), Some(7));
        assert!(!restored.get());
    }

    #[test]
    fn setup_error_survives_a_failed_restore() {
        let result: Result<()> = restore_on_error(Err(eyre!("no tty")), || Err(eyre!("stdout closed")));
        let err = result.err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("no tty"));
    }
}
