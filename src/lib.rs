//! # quiz-funnel
//!
//! A terminal quiz funnel: a fixed sequence of question steps that scores
//! the user's answers into one of two recommendation paths, plays a short
//! loading sequence and ends on a path-specific results page with charts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_funnel::{Funnel, FunnelError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FunnelError> {
//!     // The built-in funnel, or `Funnel::from_json("funnel.json")?`
//!     let funnel = Funnel::builtin();
//!
//!     // Run the funnel in the terminal
//!     funnel.run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod flow;
pub mod logging;
pub mod models;
pub mod terminal;
mod ui;
pub mod view;

use std::io;
use std::path::Path;
use std::time::Instant;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, info};

pub use app::{App, Row, Screen};
pub use config::{ConfigError, FunnelConfig};
pub use data::{load_funnel_from_json, nuora_funnel, LoadError};
pub use flow::{FlowController, FlowError};
pub use models::{FunnelDefinition, PathTag, StepDef, StepId, StepKind};

/// Error type for funnel operations.
#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("failed to load funnel: {0}")]
    Load(#[from] LoadError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A funnel session that can be run in the terminal.
pub struct Funnel {
    app: App,
}

impl Funnel {
    pub fn new(definition: FunnelDefinition, config: FunnelConfig) -> Self {
        Self {
            app: App::new(definition, config),
        }
    }

    /// The funnel that ships with the binary, default timings.
    pub fn builtin() -> Self {
        Self::new(nuora_funnel(), FunnelConfig::default())
    }

    /// Load a funnel definition from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quiz_funnel::Funnel;
    ///
    /// let funnel = Funnel::from_json("funnel.json").expect("Failed to load funnel");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, FunnelError> {
        let definition = load_funnel_from_json(path)?;
        Ok(Self::new(definition, FunnelConfig::default()))
    }

    /// Replace the timing configuration. Starts a fresh session.
    pub fn with_config(self, config: FunnelConfig) -> Result<Self, FunnelError> {
        config.validate()?;
        let definition = self.app.controller().funnel().clone();
        Ok(Self::new(definition, config))
    }

    /// Run the funnel in the terminal.
    ///
    /// This takes over the terminal and returns when the user quits.
    pub async fn run(mut self) -> Result<(), FunnelError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app).await;
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}

async fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), FunnelError> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            _ = sleep_until(app.next_deadline()) => {
                let fired = app.tick();
                debug!(fired, "timers fired");
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_input(app, key.code) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    info!(step = %app.controller().current_step(), "funnel closed");
    Ok(())
}

/// Sleep until the next timer is due, or forever if none is pending.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        None => std::future::pending().await,
    }
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.screen() {
        Screen::Question => handle_question_input(app, key),
        Screen::Loading => is_quit(key),
        Screen::Result => handle_result_input(app, key),
    }
}

fn is_quit(key: KeyCode) -> bool {
    matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}

fn handle_question_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_row();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_row();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.activate();
            false
        }
        key => is_quit(key),
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        key => is_quit(key),
    }
}
