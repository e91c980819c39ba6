//! Raw-mode setup and teardown for the funnel's terminal.

use std::io::{self, Stdout};
use std::panic;

use crossterm::{
    cursor::{Hide, Show},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> io::Result<AppTerminal> {
    setup_panic_hook();
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?.execute(Hide)?;
    debug!("terminal entered alternate screen");
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Leave raw mode. Safe to call more than once.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?.execute(Show)?;
    debug!("terminal restored");
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        tracing::error!(%panic_info, "panic");
        original_hook(panic_info);
    }));
}
